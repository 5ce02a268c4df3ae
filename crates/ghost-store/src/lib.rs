//! In-memory dashboard state for Ghost Broker.
//!
//! The [`Store`] is the single ingestion point for both REST seed fetches and
//! live hub events. List slices live behind `parking_lot` locks, per-commodity
//! slices in `DashMap`s, and a `tokio::sync::watch` revision counter lets
//! consumers coalesce refreshes.

pub mod config;
pub mod feed;
pub mod store;

pub use config::StoreConfig;
pub use feed::CappedFeed;
pub use store::{ChainStatus, PricePoint, Store};
