//! Application configuration.

use crate::error::{AppError, AppResult};
use ghost_dashboard::DashboardConfig;
use ghost_store::StoreConfig;
use ghost_ws::{Channel, ConnectionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the indexer REST API.
    pub api_url: ApiUrl,
    /// WebSocket URL of the event hub.
    pub ws_url: WsUrl,
    /// Channels to subscribe to. Empty means all fixed channels.
    pub channels: Vec<String>,
    pub chain: ChainConfig,
    pub websocket: WsConfig,
    pub store: StoreConfig,
    pub poll: PollConfig,
    pub dashboard: DashboardConfig,
}

/// Newtype wrappers so `#[serde(default)]` picks up the local endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiUrl(pub String);

impl Default for ApiUrl {
    fn default() -> Self {
        Self("http://localhost:8000".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WsUrl(pub String);

impl Default for WsUrl {
    fn default() -> Self {
        Self("ws://localhost:8000/ws".to_string())
    }
}

/// Chain identity and contract addresses, used for display and for validating
/// calldata targets returned by the indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub ghost_token: String,
    pub broker_agent: String,
    pub ghost_market: String,
    pub match_engine: String,
    pub reputation_oracle: String,
    pub stake_vault: String,
    pub partnership_registry: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        let zero = "0x0000000000000000000000000000000000000000".to_string();
        Self {
            chain_id: 10143,
            ghost_token: zero.clone(),
            broker_agent: zero.clone(),
            ghost_market: zero.clone(),
            match_engine: zero.clone(),
            reputation_oracle: zero.clone(),
            stake_vault: zero.clone(),
            partnership_registry: zero,
        }
    }
}

/// WebSocket configuration subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WsConfig {
    /// Fixed delay before each reconnect attempt (ms).
    pub reconnect_delay_ms: u64,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 5000,
        }
    }
}

/// REST refresh cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Agents and leaderboard refresh (seconds).
    pub agents_interval_secs: u64,
    /// Engine status refresh (seconds).
    pub engine_interval_secs: u64,
    /// Token stats and oracle feeds refresh (seconds).
    pub token_interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            agents_interval_secs: 15,
            engine_interval_secs: 10,
            token_interval_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(%path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Subscription channels: configured list, or all fixed channels.
    pub fn subscription_channels(&self) -> Vec<Channel> {
        if self.channels.is_empty() {
            Channel::all()
        } else {
            self.channels.iter().map(|c| Channel::new(c)).collect()
        }
    }

    /// Build the hub connection config.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.ws_url.0.clone(),
            channels: self.subscription_channels(),
            reconnect_delay_ms: self.websocket.reconnect_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_url.0, "http://localhost:8000");
        assert_eq!(config.ws_url.0, "ws://localhost:8000/ws");
        assert_eq!(config.chain.chain_id, 10143);
        assert_eq!(config.websocket.reconnect_delay_ms, 5000);
        assert_eq!(config.subscription_channels().len(), 8);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
api_url = "http://indexer:9000"
channels = ["market.trades", "chain.block"]

[websocket]
reconnect_delay_ms = 2000

[store]
trade_feed_cap = 50
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api_url.0, "http://indexer:9000");
        // Unset fields keep their defaults
        assert_eq!(config.ws_url.0, "ws://localhost:8000/ws");
        assert_eq!(config.websocket.reconnect_delay_ms, 2000);
        assert_eq!(config.store.trade_feed_cap, 50);
        assert_eq!(config.store.decision_feed_cap, 100);

        let channels = config.subscription_channels();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].as_str(), "market.trades");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("/nonexistent/ghost.toml").unwrap();
        assert_eq!(config.poll.agents_interval_secs, 15);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "api_url = [[[").unwrap();
        let err = AppConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
