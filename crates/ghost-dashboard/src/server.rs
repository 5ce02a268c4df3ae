//! HTTP server implementation using axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures_util::stream::StreamExt;
use futures_util::SinkExt;
use ghost_store::Store;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::views::{collect_snapshot, DashboardMessage, DashboardSnapshot};

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    broadcast_tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(store: Arc<Store>, broadcast_tx: broadcast::Sender<String>) -> Self {
        Self {
            store,
            broadcast_tx,
        }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/pause", post(set_pause))
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Body of the feed-pause toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
}

/// Serve the index HTML page.
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Get the current snapshot as JSON.
async fn get_snapshot(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(collect_snapshot(&state.store))
}

/// Pause or resume the live trade feed. The flag bumps the store revision,
/// so connected clients see the new state on the next update.
async fn set_pause(State(state): State<AppState>, Json(req): Json<PauseRequest>) -> Json<serde_json::Value> {
    info!(paused = req.paused, "Trade feed pause toggled");
    state.store.set_feed_paused(req.paused);
    Json(json!({ "paused": req.paused }))
}

/// Liveness probe.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// WebSocket upgrade handler.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    info!("New dashboard WebSocket connection");
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
        .into_response()
}

/// Handle a dashboard WebSocket connection: full snapshot first, then
/// coalesced updates from the broadcaster.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut broadcast_rx = state.broadcast_tx.subscribe();

    let initial = DashboardMessage::Snapshot(collect_snapshot(&state.store));
    if let Ok(json) = serde_json::to_string(&initial) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            debug!("Failed to send initial snapshot, client disconnected");
            return;
        }
    }

    // Drain the client side for close frames
    let mut incoming_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            result = broadcast_rx.recv() => {
                match result {
                    Ok(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            debug!("Failed to send update, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "Dashboard client lagged, catching up");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }
            _ = &mut incoming_task => {
                break;
            }
        }
    }

    info!("Dashboard WebSocket connection closed");
}

/// Run the dashboard HTTP server.
pub async fn run_server(
    store: Arc<Store>,
    config: DashboardConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Small buffer; updates are coalesced snapshots, stale ones are useless
    let (broadcast_tx, _) = broadcast::channel::<String>(32);

    let state = AppState::new(store.clone(), broadcast_tx.clone());
    let app = create_router(state);

    tokio::spawn(crate::broadcast::run_broadcaster(
        store,
        broadcast_tx,
        config.update_interval_ms,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(port = config.port, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_store::StoreConfig;

    fn state() -> (Arc<Store>, AppState) {
        let store = Arc::new(Store::new(StoreConfig::default()));
        let (tx, _) = broadcast::channel(8);
        (store.clone(), AppState::new(store, tx))
    }

    #[tokio::test]
    async fn test_pause_endpoint_toggles_store_flag() {
        let (store, state) = state();
        assert!(!store.feed_paused());

        let resp = set_pause(State(state.clone()), Json(PauseRequest { paused: true })).await;
        assert!(store.feed_paused());
        assert_eq!(resp.0["paused"], true);

        set_pause(State(state), Json(PauseRequest { paused: false })).await;
        assert!(!store.feed_paused());
    }

    #[tokio::test]
    async fn test_pause_flag_appears_in_snapshot() {
        let (store, state) = state();
        set_pause(State(state), Json(PauseRequest { paused: true })).await;
        let snapshot = collect_snapshot(&store);
        assert!(snapshot.top_bar.feed_paused);
    }
}
