//! View builders.
//!
//! Pure functions from the store to the serializable shapes the dashboard
//! renders: agent cards, leaderboard rows, price tickers, feed rows, order
//! book ladders, and the top status bar. Wei balances are converted to whole
//! GHOST here so templates and clients never touch raw chain units.

use ghost_core::{wei_to_token, AgentStrategy, AgentTier, Commodity, OrderBookLevel, TradeAction};
use ghost_store::Store;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One agent card on the agents grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub token_id: u64,
    pub name: Option<String>,
    pub strategy: AgentStrategy,
    pub state: AgentTier,
    /// Current capital in whole GHOST.
    pub capital: Decimal,
    pub win_rate: f64,
    pub score: Option<u32>,
    pub preferred_commodity: Option<Commodity>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub agent_id: u64,
    pub score: u32,
    pub state: AgentTier,
    /// Capital in whole GHOST.
    pub capital: Decimal,
}

/// Price ticker for one commodity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTicker {
    pub commodity: Commodity,
    pub price: Decimal,
    /// Percent change across the retained history window.
    pub change_pct: f64,
    pub updated_at: i64,
}

/// One row in the live trade feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRow {
    pub commodity: Commodity,
    pub price: Decimal,
    pub qty: Decimal,
    pub agent_bid: u64,
    pub agent_ask: u64,
    pub block_number: u64,
    pub timestamp: i64,
}

/// One row in the decision feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRow {
    pub agent_id: String,
    pub action: TradeAction,
    pub commodity: Commodity,
    pub reasoning: String,
    pub confidence: f64,
    pub block_number: u64,
}

/// Order book ladder for one commodity, with derived mid and spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLadder {
    pub commodity: Commodity,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
    pub mid_price: Option<f64>,
    pub spread_pct: Option<f64>,
}

/// Top status bar: chain head, engine counters, burn total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopBar {
    pub block_number: u64,
    pub tps: f64,
    pub queue_depth: u32,
    pub total_trades: u64,
    /// Total GHOST burned, in whole tokens.
    pub total_burned: Decimal,
    pub feed_paused: bool,
}

/// Full dashboard snapshot, the shape served at `/api/snapshot` and pushed
/// over `/ws`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub timestamp_ms: i64,
    pub top_bar: TopBar,
    pub agents: Vec<AgentCard>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub tickers: Vec<PriceTicker>,
    pub trades: Vec<TradeRow>,
    pub decisions: Vec<DecisionRow>,
    pub books: Vec<BookLadder>,
}

/// Message frame pushed to dashboard WebSocket clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardMessage {
    /// Full state, sent once on connect.
    Snapshot(DashboardSnapshot),
    /// Coalesced refresh.
    Update(DashboardSnapshot),
}

/// Build the full snapshot from current store state.
pub fn collect_snapshot(store: &Store) -> DashboardSnapshot {
    let chain = store.chain();
    let engine = store.engine_status();
    let total_burned = wei_to_token(&store.total_burned());

    let top_bar = TopBar {
        block_number: chain.block_number,
        tps: chain.tps,
        queue_depth: engine.as_ref().map(|e| e.queue_depth).unwrap_or(0),
        total_trades: engine.as_ref().map(|e| e.total_trades).unwrap_or(0),
        total_burned,
        feed_paused: store.feed_paused(),
    };

    let agents = store
        .agents()
        .into_iter()
        .map(|agent| AgentCard {
            win_rate: agent.win_rate(),
            capital: wei_to_token(&agent.capital),
            token_id: agent.token_id,
            name: agent.name,
            strategy: agent.strategy,
            state: agent.state,
            score: agent.score,
            preferred_commodity: agent.preferred_commodity,
        })
        .collect();

    let leaderboard = store
        .leaderboard()
        .into_iter()
        .map(|entry| LeaderboardRow {
            rank: entry.rank,
            agent_id: entry.agent_id,
            score: entry.score,
            state: entry.state,
            capital: wei_to_token(&entry.capital),
        })
        .collect();

    let tickers = store
        .priced_commodities()
        .into_iter()
        .filter_map(|commodity| {
            let point = store.price(&commodity)?;
            let change_pct = price_change_pct(&store.price_history(&commodity));
            Some(PriceTicker {
                commodity,
                price: point.price,
                change_pct,
                updated_at: point.updated_at,
            })
        })
        .collect();

    let trades = store
        .trades()
        .into_iter()
        .map(|trade| TradeRow {
            price: trade.matched_price_value(),
            qty: trade.matched_qty_value(),
            commodity: trade.commodity,
            agent_bid: trade.agent_bid,
            agent_ask: trade.agent_ask,
            block_number: trade.block_number,
            timestamp: trade.timestamp,
        })
        .collect();

    let decisions = store
        .decisions()
        .into_iter()
        .map(|decision| DecisionRow {
            agent_id: decision.agent_id,
            action: decision.action,
            commodity: decision.commodity,
            reasoning: decision.reasoning,
            confidence: decision.confidence,
            block_number: decision.block_number,
        })
        .collect();

    let books = store
        .priced_commodities()
        .into_iter()
        .filter_map(|commodity| {
            let book = store.orderbook(&commodity)?;
            let (mid_price, spread_pct) = derive_mid_and_spread(&book.bids, &book.asks);
            Some(BookLadder {
                commodity,
                bids: book.bids,
                asks: book.asks,
                mid_price,
                spread_pct,
            })
        })
        .collect();

    DashboardSnapshot {
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
        top_bar,
        agents,
        leaderboard,
        tickers,
        trades,
        decisions,
        books,
    }
}

/// Percent change across the history window. History is newest first.
fn price_change_pct(history: &[ghost_store::PricePoint]) -> f64 {
    let (Some(newest), Some(oldest)) = (history.first(), history.last()) else {
        return 0.0;
    };
    if oldest.price.is_zero() {
        return 0.0;
    }
    let newest = newest.price.to_f64().unwrap_or(0.0);
    let oldest = oldest.price.to_f64().unwrap_or(0.0);
    (newest - oldest) / oldest * 100.0
}

/// Mid price and spread percentage from the best book levels.
fn derive_mid_and_spread(
    bids: &[OrderBookLevel],
    asks: &[OrderBookLevel],
) -> (Option<f64>, Option<f64>) {
    let (Some(best_bid), Some(best_ask)) = (bids.first(), asks.first()) else {
        return (None, None);
    };
    let mid = (best_bid.price + best_ask.price) / 2.0;
    if mid == 0.0 {
        return (Some(mid), None);
    }
    let spread = (best_ask.price - best_bid.price) / mid * 100.0;
    (Some(mid), Some(spread))
}
