//! Core domain types for the Ghost Broker dashboard client.
//!
//! This crate mirrors the records served by the Ghost Broker REST API and
//! WebSocket hub:
//! - `Agent`, `Trade`, `Decision`: the simulation's primary records
//! - `AgentTier`, `TradeAction`: lifecycle and action enums
//! - `Commodity`: open-set commodity symbol key
//! - Defensive numeric parsing for string-encoded prices and wei amounts

pub mod decimal;
pub mod types;

pub use decimal::{parse_decimal_or_zero, wei_to_token};
pub use types::{
    Agent, AgentStrategy, AgentTier, CalldataResponse, Candle, Commodity, Covenant,
    CovenantStatus, Decision, EngineStatus, HealthResponse, LeaderboardEntry, LifecycleEvent,
    LifecycleLog, OracleFeed, Order, OrderBookLevel, OrderBookSnapshot, OrderSide, OrderStatus,
    Reputation, Spread, StakerPosition, TokenStats, Trade, TradeAction, Vault,
};
