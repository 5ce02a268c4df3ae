//! Error types for the WebSocket event stream client.

use thiserror::Error;

/// WebSocket client errors.
#[derive(Debug, Error)]
pub enum WsError {
    #[error("WebSocket transport error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection closed by server: code={code}, reason={reason}")]
    ConnectionClosed { code: u16, reason: String },
}

/// Result type for WebSocket operations.
pub type WsResult<T> = Result<T, WsError>;
