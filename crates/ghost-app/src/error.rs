//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] ghost_ws::WsError),

    #[error("API error: {0}")]
    Api(#[from] ghost_api::ApiError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] ghost_telemetry::TelemetryError),

    #[error("Dashboard error: {0}")]
    Dashboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
