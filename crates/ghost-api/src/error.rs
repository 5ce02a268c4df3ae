//! Error types for the REST client.

use thiserror::Error;

/// REST client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for REST operations.
pub type ApiResult<T> = Result<T, ApiError>;
