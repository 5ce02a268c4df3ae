//! Ghost Broker dashboard client daemon.
//!
//! Mirrors the on-chain trading game into an in-memory store and re-serves it
//! as a web dashboard:
//! - REST seed and refresh from the indexer API
//! - Live event stream from the WebSocket hub
//! - axum server with snapshot endpoint and push updates

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
