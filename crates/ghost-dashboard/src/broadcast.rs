//! WebSocket broadcast task.
//!
//! Watches the store revision and pushes a coalesced snapshot to all
//! connected dashboard clients. Back-to-back store changes inside one
//! interval produce a single update.

use std::sync::Arc;
use std::time::Duration;

use ghost_store::Store;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::views::{collect_snapshot, DashboardMessage};

/// Run the broadcaster until the store is dropped.
pub async fn run_broadcaster(store: Arc<Store>, tx: broadcast::Sender<String>, interval_ms: u64) {
    let mut revision = store.subscribe();
    let throttle = Duration::from_millis(interval_ms);

    loop {
        if revision.changed().await.is_err() {
            debug!("Store dropped, stopping broadcaster");
            return;
        }

        // Let further mutations land, then emit one coalesced update
        tokio::time::sleep(throttle).await;
        revision.borrow_and_update();

        let msg = DashboardMessage::Update(collect_snapshot(&store));
        match serde_json::to_string(&msg) {
            Ok(json) => match tx.send(json) {
                Ok(n) => trace!(receivers = n, "Broadcast update sent"),
                // No clients connected
                Err(_) => trace!("No WebSocket receivers connected"),
            },
            Err(e) => {
                debug!(error = %e, "Failed to serialize dashboard update");
            }
        }
    }
}
