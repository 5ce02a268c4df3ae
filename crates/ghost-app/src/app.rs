//! Main application orchestration.
//!
//! Wires the pieces together:
//! - REST seed fetches into the store on startup
//! - Hub event stream feeding [`Store::apply`]
//! - Periodic REST refreshes for slices without a live channel
//! - Dashboard server re-serving the store
//!
//! Seed and refresh failures are logged and retried on the next tick; the
//! daemon stays up as long as the process does.

use crate::config::AppConfig;
use crate::error::AppResult;
use ghost_api::ApiClient;
use ghost_store::Store;
use ghost_ws::{EventStreamClient, WsEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{error, info, warn};

/// Leaderboard rows fetched per refresh.
const LEADERBOARD_LIMIT: u32 = 50;

/// Main application.
pub struct Application {
    config: AppConfig,
    api: ApiClient,
    store: Arc<Store>,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = ApiClient::new(config.api_url.0.clone())?;
        let store = Arc::new(Store::new(config.store.clone()));
        Ok(Self { config, api, store })
    }

    /// Shared handle to the store, for embedding.
    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    /// Run until ctrl-c.
    pub async fn run(self) -> AppResult<()> {
        info!(
            api_url = %self.config.api_url.0,
            ws_url = %self.config.ws_url.0,
            chain_id = self.config.chain.chain_id,
            "Starting Ghost Broker dashboard client"
        );

        self.seed().await;

        // Hub event stream
        let (event_tx, mut event_rx) = mpsc::channel::<WsEvent>(1000);
        let client = Arc::new(EventStreamClient::new(
            self.config.connection_config(),
            event_tx,
        ));
        let stream = client.clone();
        let ws_handle = tokio::spawn(async move {
            if let Err(e) = stream.run().await {
                error!(?e, "Event stream failed");
            }
        });

        // Dashboard server
        if self.config.dashboard.enabled {
            let store = self.store.clone();
            let dashboard = self.config.dashboard.clone();
            tokio::spawn(async move {
                if let Err(e) = ghost_dashboard::run_server(store, dashboard).await {
                    error!(error = %e, "Dashboard server failed");
                }
            });
        }

        // Refresh timers; the seed already fetched, so skip the immediate tick
        let poll = &self.config.poll;
        let mut agents_tick = delayed_interval(poll.agents_interval_secs);
        let mut engine_tick = delayed_interval(poll.engine_interval_secs);
        let mut token_tick = delayed_interval(poll.token_interval_secs);

        info!("Entering main event loop");
        let mut event_count = 0u64;

        loop {
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    event_count += 1;
                    self.store.apply(&event);
                }

                _ = agents_tick.tick() => {
                    self.refresh_agents().await;
                }

                _ = engine_tick.tick() => {
                    self.refresh_engine().await;
                }

                _ = token_tick.tick() => {
                    self.refresh_token().await;
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(event_count, "Shutting down");
        client.shutdown();
        ws_handle.abort();

        Ok(())
    }

    /// Initial fetch of every slice. Best effort: the hub stream and refresh
    /// timers fill in whatever fails here.
    async fn seed(&self) {
        info!("Seeding store from REST API");

        self.refresh_agents().await;
        self.refresh_engine().await;
        self.refresh_token().await;

        match self
            .api
            .trades(None, self.config.store.trade_feed_cap as u32)
            .await
        {
            Ok(trades) => self.store.seed_trades(trades),
            Err(e) => warn!(%e, "Failed to seed trades"),
        }

        match self
            .api
            .engine_decisions(self.config.store.decision_feed_cap as u32)
            .await
        {
            Ok(decisions) => self.store.seed_decisions(decisions),
            Err(e) => warn!(%e, "Failed to seed decisions"),
        }

        // Order books for every commodity the oracle knows about
        for commodity in self.store.priced_commodities() {
            match self.api.orderbook(&commodity).await {
                Ok(book) => self.store.set_orderbook(commodity, book),
                Err(e) => warn!(%commodity, %e, "Failed to seed order book"),
            }
        }
    }

    async fn refresh_agents(&self) {
        match self.api.agents(None, None).await {
            Ok(agents) => self.store.set_agents(agents),
            Err(e) => warn!(%e, "Failed to fetch agents"),
        }
        match self.api.leaderboard(LEADERBOARD_LIMIT).await {
            Ok(entries) => self.store.set_leaderboard(entries),
            Err(e) => warn!(%e, "Failed to fetch leaderboard"),
        }
    }

    async fn refresh_engine(&self) {
        match self.api.engine_status().await {
            Ok(status) => self.store.set_engine_status(status),
            Err(e) => warn!(%e, "Failed to fetch engine status"),
        }
    }

    async fn refresh_token(&self) {
        match self.api.token_stats().await {
            Ok(stats) => self.store.set_token_stats(stats),
            Err(e) => warn!(%e, "Failed to fetch token stats"),
        }
        match self.api.oracle_feeds().await {
            Ok(feeds) => self.store.set_oracle_feeds(feeds),
            Err(e) => warn!(%e, "Failed to fetch oracle feeds"),
        }
    }
}

/// Interval whose first tick fires one period from now.
fn delayed_interval(secs: u64) -> tokio::time::Interval {
    let period = Duration::from_secs(secs.max(1));
    interval_at(Instant::now() + period, period)
}
