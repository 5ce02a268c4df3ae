//! Web dashboard re-serving Ghost Broker state.
//!
//! Serves the aggregated store back out over HTTP:
//!
//! - `GET /` static HTML shell
//! - `GET /api/snapshot` full JSON snapshot
//! - `POST /api/pause` live trade feed pause toggle
//! - `GET /healthz` liveness probe
//! - `GET /ws` WebSocket: snapshot on connect, then coalesced updates
//!
//! Updates are driven by the store's watch revision, throttled so a burst of
//! hub events produces one broadcast.

pub mod broadcast;
pub mod config;
pub mod server;
pub mod views;

pub use config::DashboardConfig;
pub use server::{create_router, run_server, AppState, PauseRequest};
pub use views::{
    collect_snapshot, AgentCard, BookLadder, DashboardMessage, DashboardSnapshot, DecisionRow,
    LeaderboardRow, PriceTicker, TopBar, TradeRow,
};
