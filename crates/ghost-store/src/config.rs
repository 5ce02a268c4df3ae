//! Store sizing configuration.

use serde::{Deserialize, Serialize};

/// Feed caps for the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum trades kept in the live trade feed.
    pub trade_feed_cap: usize,
    /// Maximum decisions kept in the decision feed.
    pub decision_feed_cap: usize,
    /// Maximum price points kept per commodity.
    pub price_history_cap: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            trade_feed_cap: 200,
            decision_feed_cap: 100,
            price_history_cap: 40,
        }
    }
}
