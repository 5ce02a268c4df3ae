//! Records and enums mirrored from the Ghost Broker backend API.
//!
//! Field names are snake_case and match the FastAPI response models exactly;
//! string-encoded numerics (wei balances, prices) stay strings here and are
//! parsed on demand via [`crate::decimal`].

use crate::decimal::parse_decimal_or_zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Enums (string-serialized, uppercase, matching the backend)
// ============================================================================

/// Agent lifecycle tier. Transitions are engine-driven and observed only
/// via lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentTier {
    Active,
    Elite,
    Bankrupt,
    Revived,
}

impl AgentTier {
    /// Map a lifecycle event name to the tier it implies.
    ///
    /// Accepts both event names (`BANKRUPTCY`, `REVIVAL`, `ELITE_PROMOTION`,
    /// `CREATED`) and plain tier names. Unrecognized names map to `None`,
    /// which leaves agent state untouched.
    pub fn from_lifecycle_event(event: &str) -> Option<Self> {
        match event {
            "BANKRUPTCY" | "BANKRUPT" => Some(Self::Bankrupt),
            "REVIVAL" | "REVIVED" => Some(Self::Revived),
            "ELITE_PROMOTION" | "ELITE" => Some(Self::Elite),
            "CREATED" | "ACTIVE" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Agent trading strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentStrategy {
    Aggressive,
    Balanced,
    Conservative,
}

/// Action taken in an agent decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Bid,
    Ask,
    Hold,
    Partner,
}

/// Order book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Bid,
    Ask,
}

/// Order state on the ghost market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Open,
    Matched,
    Expired,
    Cancelled,
}

/// Partnership covenant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CovenantStatus {
    Proposed,
    Active,
    Dissolved,
}

// ============================================================================
// Commodity key
// ============================================================================

/// Tradable commodity symbol.
///
/// The hub allows dynamic per-commodity channels (e.g.
/// `market.orderbook.GHOST_ORE`), so this is an open set rather than a
/// closed enum. Symbols are normalized to uppercase on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commodity(String);

impl Commodity {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn eth() -> Self {
        Self("ETH".to_string())
    }

    pub fn sol() -> Self {
        Self("SOL".to_string())
    }

    pub fn matic() -> Self {
        Self("MATIC".to_string())
    }

    pub fn bnb() -> Self {
        Self("BNB".to_string())
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Commodity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Agent records
// ============================================================================

/// BrokerAgent NFT record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub token_id: u64,
    pub owner_address: String,
    /// Risk appetite 0-100.
    pub risk_appetite: u32,
    pub strategy: AgentStrategy,
    /// Initial capital in wei.
    pub initial_capital: String,
    /// Current capital in wei.
    pub capital: String,
    pub state: AgentTier,
    pub win_count: u32,
    pub loss_count: u32,
    pub created_at: i64,
    pub last_tick_at: i64,
    /// Reputation score 0-10000, present when the backend enriches the row.
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reputation_score: Option<f64>,
    #[serde(default)]
    pub last_action: Option<String>,
    #[serde(default)]
    pub preferred_commodity: Option<Commodity>,
}

impl Agent {
    /// Win rate over settled trades, 0.0 when none have settled.
    pub fn win_rate(&self) -> f64 {
        let total = self.win_count + self.loss_count;
        if total == 0 {
            0.0
        } else {
            f64::from(self.win_count) / f64::from(total)
        }
    }
}

/// Matched trade emitted by the external engine. Immutable once observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub bid_order_id: String,
    pub ask_order_id: String,
    pub agent_bid: u64,
    pub agent_ask: u64,
    pub commodity: Commodity,
    pub matched_qty: String,
    pub matched_price: String,
    pub fee_burned: String,
    pub block_number: u64,
    pub timestamp: i64,
}

impl Trade {
    pub fn matched_price_value(&self) -> Decimal {
        parse_decimal_or_zero(&self.matched_price)
    }

    pub fn matched_qty_value(&self) -> Decimal {
        parse_decimal_or_zero(&self.matched_qty)
    }
}

/// Resting or historical order on the ghost market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub agent_id: u64,
    pub agent_owner: String,
    pub commodity: Commodity,
    pub side: OrderSide,
    pub price: String,
    pub qty: String,
    pub filled_qty: String,
    pub status: OrderStatus,
    pub ttl_blocks: u32,
    pub created_block: u64,
    pub created_at: i64,
}

/// AI-agent decision record with reasoning and confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub tx_hash: String,
    pub agent_id: String,
    pub action: TradeAction,
    pub commodity: Commodity,
    pub price: String,
    pub qty: String,
    pub reasoning: String,
    /// Confidence 0.0-1.0.
    pub confidence: f64,
    pub block_number: u64,
    pub timestamp: i64,
}

/// Lifecycle history entry from `/v1/agents/{id}/lifecycle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub block: u64,
    pub timestamp: i64,
    pub details: String,
}

/// Lifecycle history wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleLog {
    pub events: Vec<LifecycleEvent>,
}

// ============================================================================
// Reputation and leaderboard
// ============================================================================

/// Reputation aggregates maintained by the external reputation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reputation {
    pub agent_id: u64,
    pub total_trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub max_drawdown: String,
    pub score: u32,
    pub apy_multiplier: f64,
}

/// One leaderboard row. The leaderboard is replaced wholesale on each fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub agent_id: u64,
    pub score: u32,
    pub state: AgentTier,
    pub capital: String,
}

// ============================================================================
// Staking and partnerships
// ============================================================================

/// Stake vault aggregates for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vault {
    pub agent_id: u64,
    pub total_shares: String,
    pub total_deposited: String,
    pub total_rewards: String,
    pub apy_multiplier: f64,
}

/// One staker's position in an agent vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakerPosition {
    pub agent_id: u64,
    pub shares: String,
    pub pending_rewards: String,
}

/// Partnership covenant between two agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Covenant {
    pub covenant_id: u64,
    pub agent_a: u64,
    pub agent_b: u64,
    pub capital_a: String,
    pub capital_b: String,
    pub profit_split_a: u32,
    pub profit_split_b: u32,
    pub status: CovenantStatus,
    pub proposed_at: i64,
    pub activated_at: i64,
    pub dissolved_at: i64,
    pub total_profit_distributed: String,
}

/// Transaction calldata handed off to an external wallet for signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalldataResponse {
    pub calldata: String,
    pub to: String,
}

// ============================================================================
// Market data
// ============================================================================

/// One aggregated order book level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub quantity: f64,
    pub total: f64,
}

/// Per-commodity order book snapshot, replaced wholesale per update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

/// OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Best bid/ask spread summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spread {
    pub commodity: Commodity,
    pub best_bid: String,
    pub best_ask: String,
    pub mid_price: f64,
    pub spread_pct: f64,
}

/// Match engine status counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub current_block: u64,
    pub last_batch_block: u64,
    pub queue_depth: u32,
    pub total_trades: u64,
    pub total_volume: String,
}

/// Oracle price feed for one commodity.
///
/// Older backend builds keyed this by `asset` and sent the price as a JSON
/// number; both forms are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleFeed {
    #[serde(alias = "asset")]
    pub commodity: Commodity,
    #[serde(deserialize_with = "de_string_or_number")]
    pub price: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub updated_at: i64,
    #[serde(default)]
    pub source: Option<String>,
}

impl OracleFeed {
    /// Parsed price, zero on malformed input.
    pub fn price_value(&self) -> Decimal {
        parse_decimal_or_zero(&self.price)
    }
}

/// GHOST token supply and burn stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStats {
    pub total_supply: String,
    pub circulating_supply: String,
    pub total_burned: String,
    pub burn_rate_24h: String,
}

/// `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub chain: String,
}

/// Accept a JSON string or number and normalize to `String`.
fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
