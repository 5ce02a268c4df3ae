//! Hub channel names.

use ghost_core::Commodity;
use serde::{Deserialize, Serialize};

/// A hub subscription channel.
///
/// The hub serves a fixed set of named channels plus dynamic per-commodity
/// order book channels (`market.orderbook.<COMMODITY>`), so this is an open
/// string key rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    pub const TRADES: &'static str = "market.trades";
    pub const ORDERBOOK: &'static str = "market.orderbook";
    pub const PRICES: &'static str = "oracle.prices";
    pub const LIFECYCLE: &'static str = "agent.lifecycle";
    pub const DECISIONS: &'static str = "agent.decisions";
    pub const BATCH: &'static str = "engine.batch";
    pub const BURN: &'static str = "token.burn";
    pub const BLOCK: &'static str = "chain.block";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Per-commodity order book channel, e.g. `market.orderbook.ETH`.
    pub fn orderbook_for(commodity: &Commodity) -> Self {
        Self(format!("{}.{}", Self::ORDERBOOK, commodity))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All fixed channels, in hub order.
    pub fn all() -> Vec<Self> {
        [
            Self::TRADES,
            Self::ORDERBOOK,
            Self::PRICES,
            Self::LIFECYCLE,
            Self::DECISIONS,
            Self::BATCH,
            Self::BURN,
            Self::BLOCK,
        ]
        .into_iter()
        .map(Self::new)
        .collect()
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Channel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderbook_for_commodity() {
        let ch = Channel::orderbook_for(&Commodity::eth());
        assert_eq!(ch.as_str(), "market.orderbook.ETH");
    }

    #[test]
    fn test_all_channels() {
        let all = Channel::all();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].as_str(), "market.trades");
        assert_eq!(all[7].as_str(), "chain.block");
    }
}
