//! Dashboard state store.
//!
//! Single writer-friendly in-memory state fed from two sources: REST seed
//! fetches replace slices wholesale, and hub events mutate them incrementally
//! via [`Store::apply`]. Every mutation bumps a watch revision so consumers
//! can coalesce refreshes instead of reacting per event.

use crate::config::StoreConfig;
use crate::feed::CappedFeed;
use dashmap::DashMap;
use ghost_core::{
    parse_decimal_or_zero, Agent, AgentTier, Commodity, Decision, EngineStatus, LeaderboardEntry,
    OracleFeed, OrderBookSnapshot, TokenStats, Trade,
};
use ghost_ws::{BlockNotice, BurnNotice, WsEvent};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// One oracle price observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Decimal,
    pub confidence: Option<f64>,
    pub updated_at: i64,
}

/// Latest chain head seen on the block channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainStatus {
    pub block_number: u64,
    pub tps: f64,
}

/// In-memory dashboard state.
pub struct Store {
    config: StoreConfig,
    agents: RwLock<Vec<Agent>>,
    leaderboard: RwLock<Vec<LeaderboardEntry>>,
    trades: RwLock<CappedFeed<Trade>>,
    decisions: RwLock<CappedFeed<Decision>>,
    orderbooks: DashMap<Commodity, OrderBookSnapshot>,
    prices: DashMap<Commodity, PricePoint>,
    price_history: DashMap<Commodity, CappedFeed<PricePoint>>,
    engine_status: RwLock<Option<EngineStatus>>,
    token_stats: RwLock<Option<TokenStats>>,
    /// Total GHOST burned (wei string). Seeded from token stats and replaced
    /// wholesale by every burn event, so burns are visible even when the
    /// stats fetch never succeeded.
    total_burned: RwLock<String>,
    last_burn: RwLock<Option<BurnNotice>>,
    chain: RwLock<ChainStatus>,
    feed_paused: AtomicBool,
    revision: watch::Sender<u64>,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            trades: RwLock::new(CappedFeed::new(config.trade_feed_cap)),
            decisions: RwLock::new(CappedFeed::new(config.decision_feed_cap)),
            config,
            agents: RwLock::new(Vec::new()),
            leaderboard: RwLock::new(Vec::new()),
            orderbooks: DashMap::new(),
            prices: DashMap::new(),
            price_history: DashMap::new(),
            engine_status: RwLock::new(None),
            token_stats: RwLock::new(None),
            total_burned: RwLock::new("0".to_string()),
            last_burn: RwLock::new(None),
            chain: RwLock::new(ChainStatus::default()),
            feed_paused: AtomicBool::new(false),
            revision,
        }
    }

    /// Subscribe to the revision counter. The value is bumped on every
    /// mutation; consumers treat it as a dirty flag, not a sequence.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision value.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    // ------------------------------------------------------------------
    // Event ingestion
    // ------------------------------------------------------------------

    /// Apply one hub event.
    ///
    /// Each event tag has exactly one mutation. Lifecycle events for agents
    /// not currently loaded are dropped; the next full agent fetch picks the
    /// transition up.
    pub fn apply(&self, event: &WsEvent) {
        match event {
            WsEvent::Trade(trade) => {
                if self.feed_paused.load(Ordering::Relaxed) {
                    return;
                }
                self.trades.write().push(trade.clone());
            }
            WsEvent::OrderBook(update) => {
                self.orderbooks.insert(
                    update.commodity.clone(),
                    OrderBookSnapshot {
                        bids: update.bids.clone(),
                        asks: update.asks.clone(),
                    },
                );
            }
            WsEvent::Price(update) => {
                let point = PricePoint {
                    price: parse_decimal_or_zero(&update.price),
                    confidence: update.confidence,
                    updated_at: update.updated_at,
                };
                self.prices.insert(update.commodity.clone(), point.clone());
                self.price_history
                    .entry(update.commodity.clone())
                    .or_insert_with(|| CappedFeed::new(self.config.price_history_cap))
                    .push(point);
            }
            WsEvent::Lifecycle(notice) => {
                let Some(tier) = AgentTier::from_lifecycle_event(&notice.event) else {
                    debug!(event = %notice.event, "Lifecycle event without tier change");
                    return;
                };
                let mut agents = self.agents.write();
                match agents.iter_mut().find(|a| a.token_id == notice.agent_id) {
                    Some(agent) => agent.state = tier,
                    None => {
                        debug!(agent_id = notice.agent_id, "Lifecycle event for unloaded agent");
                        return;
                    }
                }
            }
            WsEvent::Decision(decision) => {
                // Pausing freezes the trade ticker only
                self.decisions.write().push(decision.clone());
            }
            WsEvent::Burn(notice) => {
                *self.last_burn.write() = Some(notice.clone());
                *self.total_burned.write() = notice.total_burned.clone();
                if let Some(stats) = self.token_stats.write().as_mut() {
                    stats.total_burned = notice.total_burned.clone();
                }
            }
            WsEvent::Block(notice) => {
                let BlockNotice { block_number, tps } = *notice;
                *self.chain.write() = ChainStatus { block_number, tps };
            }
        }
        self.bump();
    }

    // ------------------------------------------------------------------
    // REST seeds (wholesale replacement)
    // ------------------------------------------------------------------

    pub fn set_agents(&self, agents: Vec<Agent>) {
        *self.agents.write() = agents;
        self.bump();
    }

    pub fn set_leaderboard(&self, entries: Vec<LeaderboardEntry>) {
        *self.leaderboard.write() = entries;
        self.bump();
    }

    pub fn seed_trades(&self, trades: Vec<Trade>) {
        self.trades.write().replace(trades);
        self.bump();
    }

    pub fn seed_decisions(&self, decisions: Vec<Decision>) {
        self.decisions.write().replace(decisions);
        self.bump();
    }

    pub fn set_orderbook(&self, commodity: Commodity, snapshot: OrderBookSnapshot) {
        self.orderbooks.insert(commodity, snapshot);
        self.bump();
    }

    pub fn set_engine_status(&self, status: EngineStatus) {
        *self.engine_status.write() = Some(status);
        self.bump();
    }

    pub fn set_token_stats(&self, stats: TokenStats) {
        *self.total_burned.write() = stats.total_burned.clone();
        *self.token_stats.write() = Some(stats);
        self.bump();
    }

    pub fn set_oracle_feeds(&self, feeds: Vec<OracleFeed>) {
        for feed in feeds {
            let point = PricePoint {
                price: feed.price_value(),
                confidence: feed.confidence,
                updated_at: feed.updated_at,
            };
            self.prices.insert(feed.commodity.clone(), point.clone());
            self.price_history
                .entry(feed.commodity)
                .or_insert_with(|| CappedFeed::new(self.config.price_history_cap))
                .push(point);
        }
        self.bump();
    }

    // ------------------------------------------------------------------
    // Feed pause
    // ------------------------------------------------------------------

    /// Freeze the trade ticker. Decisions and everything else keep flowing.
    pub fn set_feed_paused(&self, paused: bool) {
        self.feed_paused.store(paused, Ordering::Relaxed);
        self.bump();
    }

    pub fn feed_paused(&self) -> bool {
        self.feed_paused.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn agents(&self) -> Vec<Agent> {
        self.agents.read().clone()
    }

    pub fn agent(&self, token_id: u64) -> Option<Agent> {
        self.agents
            .read()
            .iter()
            .find(|a| a.token_id == token_id)
            .cloned()
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard.read().clone()
    }

    pub fn trades(&self) -> Vec<Trade> {
        self.trades.read().to_vec()
    }

    pub fn decisions(&self) -> Vec<Decision> {
        self.decisions.read().to_vec()
    }

    pub fn orderbook(&self, commodity: &Commodity) -> Option<OrderBookSnapshot> {
        self.orderbooks.get(commodity).map(|e| e.value().clone())
    }

    pub fn price(&self, commodity: &Commodity) -> Option<PricePoint> {
        self.prices.get(commodity).map(|e| e.value().clone())
    }

    /// Price history for one commodity, newest first.
    pub fn price_history(&self, commodity: &Commodity) -> Vec<PricePoint> {
        self.price_history
            .get(commodity)
            .map(|e| e.value().to_vec())
            .unwrap_or_default()
    }

    /// Commodities with at least one known price, sorted by symbol.
    pub fn priced_commodities(&self) -> Vec<Commodity> {
        let mut commodities: Vec<Commodity> =
            self.prices.iter().map(|e| e.key().clone()).collect();
        commodities.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        commodities
    }

    pub fn engine_status(&self) -> Option<EngineStatus> {
        self.engine_status.read().clone()
    }

    pub fn token_stats(&self) -> Option<TokenStats> {
        self.token_stats.read().clone()
    }

    /// Total GHOST burned as a wei string, "0" until a stats fetch or burn
    /// event arrives.
    pub fn total_burned(&self) -> String {
        self.total_burned.read().clone()
    }

    pub fn last_burn(&self) -> Option<BurnNotice> {
        self.last_burn.read().clone()
    }

    pub fn chain(&self) -> ChainStatus {
        self.chain.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_core::OrderBookLevel;
    use ghost_ws::{LifecycleNotice, OrderBookUpdate, PriceUpdate};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn store() -> Store {
        Store::new(StoreConfig::default())
    }

    fn trade(block_number: u64) -> Trade {
        serde_json::from_value(json!({
            "bid_order_id": format!("b{block_number}"),
            "ask_order_id": format!("a{block_number}"),
            "agent_bid": 1,
            "agent_ask": 2,
            "commodity": "ETH",
            "matched_qty": "1.0",
            "matched_price": "1800.0",
            "fee_burned": "10",
            "block_number": block_number,
            "timestamp": 1700000000
        }))
        .unwrap()
    }

    fn decision(block_number: u64) -> Decision {
        serde_json::from_value(json!({
            "tx_hash": format!("0x{block_number:x}"),
            "agent_id": "7",
            "action": "BID",
            "commodity": "ETH",
            "price": "1800.0",
            "qty": "1.0",
            "reasoning": "momentum",
            "confidence": 0.8,
            "block_number": block_number,
            "timestamp": 1700000000
        }))
        .unwrap()
    }

    fn agent(token_id: u64, state: &str) -> Agent {
        serde_json::from_value(json!({
            "token_id": token_id,
            "owner_address": "0xabc",
            "risk_appetite": 50,
            "strategy": "BALANCED",
            "initial_capital": "100",
            "capital": "100",
            "state": state,
            "win_count": 0,
            "loss_count": 0,
            "created_at": 0,
            "last_tick_at": 0
        }))
        .unwrap()
    }

    fn price_update(commodity: &str, price: &str, updated_at: i64) -> WsEvent {
        WsEvent::Price(PriceUpdate {
            commodity: Commodity::new(commodity),
            price: price.to_string(),
            confidence: None,
            updated_at,
        })
    }

    #[test]
    fn test_trade_feed_cap_keeps_newest() {
        let store = store();
        for i in 1..=250 {
            store.apply(&WsEvent::Trade(trade(i)));
        }
        let trades = store.trades();
        assert_eq!(trades.len(), 200);
        assert_eq!(trades[0].block_number, 250);
        assert_eq!(trades[199].block_number, 51);
    }

    #[test]
    fn test_decision_feed_cap() {
        let store = store();
        for i in 1..=120 {
            store.apply(&WsEvent::Decision(decision(i)));
        }
        let decisions = store.decisions();
        assert_eq!(decisions.len(), 100);
        assert_eq!(decisions[0].block_number, 120);
    }

    #[test]
    fn test_pause_freezes_trades_not_decisions() {
        let store = store();
        store.set_feed_paused(true);
        store.apply(&WsEvent::Trade(trade(1)));
        store.apply(&WsEvent::Decision(decision(1)));
        assert!(store.trades().is_empty());
        assert_eq!(store.decisions().len(), 1);

        store.set_feed_paused(false);
        store.apply(&WsEvent::Trade(trade(2)));
        assert_eq!(store.trades().len(), 1);
    }

    #[test]
    fn test_lifecycle_updates_only_target_agent() {
        let store = store();
        store.set_agents(vec![agent(7, "ACTIVE"), agent(8, "ACTIVE")]);

        store.apply(&WsEvent::Lifecycle(LifecycleNotice {
            agent_id: 7,
            event: "BANKRUPTCY".to_string(),
            block: 100,
            details: String::new(),
        }));

        assert_eq!(store.agent(7).unwrap().state, AgentTier::Bankrupt);
        assert_eq!(store.agent(8).unwrap().state, AgentTier::Active);
    }

    #[test]
    fn test_lifecycle_unknown_agent_is_noop() {
        let store = store();
        store.set_agents(vec![agent(1, "ACTIVE")]);
        let before = store.revision();

        store.apply(&WsEvent::Lifecycle(LifecycleNotice {
            agent_id: 42,
            event: "REVIVAL".to_string(),
            block: 100,
            details: String::new(),
        }));

        assert_eq!(store.agent(1).unwrap().state, AgentTier::Active);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_lifecycle_unknown_event_is_noop() {
        let store = store();
        store.set_agents(vec![agent(1, "ACTIVE")]);

        store.apply(&WsEvent::Lifecycle(LifecycleNotice {
            agent_id: 1,
            event: "PARTNERSHIP".to_string(),
            block: 100,
            details: String::new(),
        }));

        assert_eq!(store.agent(1).unwrap().state, AgentTier::Active);
    }

    #[test]
    fn test_price_updates_are_per_commodity() {
        let store = store();
        store.apply(&price_update("ETH", "1800.0", 1));
        store.apply(&price_update("SOL", "140.0", 2));
        store.apply(&price_update("ETH", "1810.0", 3));

        assert_eq!(store.price(&Commodity::eth()).unwrap().price, dec!(1810.0));
        assert_eq!(store.price(&Commodity::sol()).unwrap().price, dec!(140.0));
        assert_eq!(store.price_history(&Commodity::eth()).len(), 2);
        assert_eq!(store.price_history(&Commodity::sol()).len(), 1);
    }

    #[test]
    fn test_price_history_cap() {
        let store = store();
        for i in 0..50 {
            store.apply(&price_update("ETH", &format!("{}", 1800 + i), i));
        }
        let history = store.price_history(&Commodity::eth());
        assert_eq!(history.len(), 40);
        // Newest first
        assert_eq!(history[0].updated_at, 49);
        assert_eq!(history[39].updated_at, 10);
    }

    #[test]
    fn test_orderbook_replaced_wholesale() {
        let store = store();
        let full = OrderBookUpdate {
            commodity: Commodity::eth(),
            bids: vec![OrderBookLevel {
                price: 1799.0,
                quantity: 2.0,
                total: 2.0,
            }],
            asks: vec![OrderBookLevel {
                price: 1801.0,
                quantity: 1.0,
                total: 1.0,
            }],
        };
        store.apply(&WsEvent::OrderBook(full));

        let empty = OrderBookUpdate {
            commodity: Commodity::eth(),
            bids: vec![],
            asks: vec![],
        };
        store.apply(&WsEvent::OrderBook(empty));

        let book = store.orderbook(&Commodity::eth()).unwrap();
        assert!(book.bids.is_empty());
        assert!(book.asks.is_empty());
    }

    #[test]
    fn test_burn_updates_token_stats_total() {
        let store = store();
        store.set_token_stats(
            serde_json::from_value(json!({
                "total_supply": "1000000",
                "circulating_supply": "900000",
                "total_burned": "100",
                "burn_rate_24h": "5"
            }))
            .unwrap(),
        );

        store.apply(&WsEvent::Burn(BurnNotice {
            amount: "50".to_string(),
            total_burned: "150".to_string(),
            block_number: 10,
        }));

        assert_eq!(store.token_stats().unwrap().total_burned, "150");
        assert_eq!(store.total_burned(), "150");
        assert_eq!(store.last_burn().unwrap().amount, "50");
    }

    #[test]
    fn test_burn_before_token_stats_still_replaces_total() {
        let store = store();
        assert_eq!(store.total_burned(), "0");

        store.apply(&WsEvent::Burn(BurnNotice {
            amount: "50".to_string(),
            total_burned: "150".to_string(),
            block_number: 10,
        }));

        assert_eq!(store.total_burned(), "150");
        assert!(store.token_stats().is_none());
    }

    #[test]
    fn test_block_updates_chain_head() {
        let store = store();
        store.apply(&WsEvent::Block(BlockNotice {
            block_number: 777,
            tps: 4.5,
        }));
        let chain = store.chain();
        assert_eq!(chain.block_number, 777);
        assert_eq!(chain.tps, 4.5);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let store = store();
        let mut rx = store.subscribe();
        let before = *rx.borrow_and_update();
        store.apply(&WsEvent::Trade(trade(1)));
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update() > before);
    }

    #[test]
    fn test_seed_trades_respects_cap() {
        let store = store();
        let trades: Vec<Trade> = (1..=300).map(trade).collect();
        store.seed_trades(trades);
        assert_eq!(store.trades().len(), 200);
    }
}
