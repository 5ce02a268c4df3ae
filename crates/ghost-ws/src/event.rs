//! Event frame decoding.
//!
//! Every frame from the hub is a JSON object `{"type": <tag>, "data": <payload>}`.
//! The tag determines the payload shape. Unknown tags decode to `None` so a
//! newer hub can add event types without breaking older clients; malformed
//! frames return an error and are dropped by the caller without tearing down
//! the connection.

use ghost_core::{Commodity, Decision, OrderBookLevel, Trade};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WsResult;

/// Raw frame wrapper from the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsFrame {
    /// Event tag (e.g. "trade", "orderbook", "ping").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload, shape determined by the tag.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Subscription directive sent after the connection opens, one per channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub subscribe: String,
}

impl SubscribeRequest {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            subscribe: channel.into(),
        }
    }
}

/// Order book replacement for one commodity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookUpdate {
    pub commodity: Commodity,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

/// Oracle price tick for one commodity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    #[serde(alias = "asset")]
    pub commodity: Commodity,
    pub price: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub updated_at: i64,
}

/// Agent lifecycle transition observed on chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleNotice {
    pub agent_id: u64,
    /// Event name (e.g. "BANKRUPTCY", "REVIVAL", "ELITE_PROMOTION").
    pub event: String,
    pub block: u64,
    #[serde(default)]
    pub details: String,
}

/// GHOST burned by a matched batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnNotice {
    pub amount: String,
    pub total_burned: String,
    pub block_number: u64,
}

/// New chain head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockNotice {
    pub block_number: u64,
    #[serde(default)]
    pub tps: f64,
}

/// Decoded hub event.
///
/// Closed union: one variant per known tag. Adding a tag here must be paired
/// with a store mutation in `ghost-store`.
#[derive(Debug, Clone)]
pub enum WsEvent {
    Trade(Trade),
    OrderBook(OrderBookUpdate),
    Price(PriceUpdate),
    Lifecycle(LifecycleNotice),
    Decision(Decision),
    Burn(BurnNotice),
    Block(BlockNotice),
}

impl WsEvent {
    /// The wire tag for this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Trade(_) => "trade",
            Self::OrderBook(_) => "orderbook",
            Self::Price(_) => "price",
            Self::Lifecycle(_) => "lifecycle",
            Self::Decision(_) => "decision",
            Self::Burn(_) => "burn",
            Self::Block(_) => "block",
        }
    }
}

/// Decode one text frame into an event.
///
/// Returns `Ok(None)` for server pings and unknown tags, `Err` when the frame
/// is not valid JSON or the payload does not match the tag's shape.
pub fn decode_frame(text: &str) -> WsResult<Option<WsEvent>> {
    let frame: WsFrame = serde_json::from_str(text)?;

    let event = match frame.event_type.as_str() {
        "trade" => WsEvent::Trade(serde_json::from_value(frame.data)?),
        "orderbook" => WsEvent::OrderBook(serde_json::from_value(frame.data)?),
        "price" => WsEvent::Price(serde_json::from_value(frame.data)?),
        "lifecycle" => WsEvent::Lifecycle(serde_json::from_value(frame.data)?),
        "decision" => WsEvent::Decision(serde_json::from_value(frame.data)?),
        "burn" => WsEvent::Burn(serde_json::from_value(frame.data)?),
        "block" => WsEvent::Block(serde_json::from_value(frame.data)?),
        // Idle keepalive from the hub, no payload
        "ping" => return Ok(None),
        other => {
            debug!(tag = other, "Unknown event tag, dropping frame");
            return Ok(None);
        }
    };

    Ok(Some(event))
}
