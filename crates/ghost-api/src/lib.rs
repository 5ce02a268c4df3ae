//! REST client for the Ghost Broker indexer API.
//!
//! Thin typed wrapper over the indexer's `/v1` endpoints. All list responses
//! are fetched in full and replace local state wholesale; the client performs
//! no caching.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
