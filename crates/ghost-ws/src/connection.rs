//! WebSocket connection manager.
//!
//! Handles connection lifecycle, automatic reconnection on a fixed delay,
//! and channel subscription on each (re)connect.

use crate::channel::Channel;
use crate::error::{WsError, WsResult};
use crate::event::{decode_frame, SubscribeRequest, WsEvent};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// WebSocket URL of the hub.
    pub url: String,
    /// Channels to subscribe to after the connection opens.
    pub channels: Vec<Channel>,
    /// Fixed delay before each reconnect attempt.
    ///
    /// The hub is a single known endpoint behind the chain indexer, so the
    /// client retries unconditionally at this fixed cadence with no backoff.
    pub reconnect_delay_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            channels: Channel::all(),
            reconnect_delay_ms: 5000,
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Hub event stream client.
///
/// Owns the read loop; decoded events are forwarded to the channel given at
/// construction. The client reconnects forever until [`Self::shutdown`] is
/// called.
pub struct EventStreamClient {
    config: ConnectionConfig,
    state: Arc<RwLock<ConnectionState>>,
    event_tx: mpsc::Sender<WsEvent>,
    reconnect_count: Arc<RwLock<u32>>,
    shutdown_token: CancellationToken,
}

impl EventStreamClient {
    pub fn new(config: ConnectionConfig, event_tx: mpsc::Sender<WsEvent>) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            event_tx,
            reconnect_count: Arc::new(RwLock::new(0)),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Number of reconnect attempts since the last successful connection.
    pub fn reconnect_count(&self) -> u32 {
        *self.reconnect_count.read()
    }

    /// Signal graceful shutdown. Both the read loop and the reconnect delay
    /// observe the token and exit promptly.
    pub fn shutdown(&self) {
        info!("EventStreamClient shutdown requested");
        self.shutdown_token.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Token observed by the read loop; clone to tie other tasks to it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Connect to the hub and run the read loop until shutdown.
    ///
    /// An empty channel set is a no-op: nothing to receive, so no connection
    /// is established.
    pub async fn run(&self) -> WsResult<()> {
        if self.config.channels.is_empty() {
            info!("No channels configured, not connecting");
            return Ok(());
        }

        let delay = Duration::from_millis(self.config.reconnect_delay_ms);

        loop {
            if self.is_shutdown() {
                *self.state.write() = ConnectionState::Disconnected;
                return Ok(());
            }

            *self.state.write() = ConnectionState::Connecting;

            match self.try_connect().await {
                Ok(()) => {
                    // Close frame or clean stream end
                    info!("WebSocket connection closed");
                }
                Err(e) => {
                    error!(?e, "WebSocket connection error");
                }
            }

            if self.is_shutdown() {
                *self.state.write() = ConnectionState::Disconnected;
                return Ok(());
            }

            let attempt = {
                let mut count = self.reconnect_count.write();
                *count += 1;
                *count
            };

            *self.state.write() = ConnectionState::Reconnecting;
            warn!(attempt, delay_ms = delay.as_millis(), "Reconnecting");

            // Fixed delay, interruptible by shutdown
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    *self.state.write() = ConnectionState::Disconnected;
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect(&self) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to event hub");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = ConnectionState::Connected;
        *self.reconnect_count.write() = 0;
        info!("WebSocket connected");

        // One subscribe directive per channel
        for channel in &self.config.channels {
            let req = SubscribeRequest::new(channel.as_str());
            let msg = serde_json::to_string(&req)?;
            write.send(Message::Text(msg)).await?;
        }
        info!(count = self.config.channels.len(), "Channels subscribed");

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in read loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(?e, "Failed to send Close frame during shutdown");
                    }
                    *self.state.write() = ConnectionState::Disconnected;
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text_frame(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            debug!("Received pong");
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "WebSocket closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(?e, "WebSocket read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Decode one frame and forward it downstream.
    ///
    /// A bad frame never tears down the connection: decode errors are logged
    /// and the frame is dropped.
    async fn handle_text_frame(&self, text: &str) {
        match decode_frame(text) {
            Ok(Some(event)) => {
                if self.event_tx.send(event).await.is_err() {
                    warn!("Event receiver dropped");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(%e, "Dropping malformed frame");
            }
        }
    }
}
