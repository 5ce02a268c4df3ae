//! Mock hub server for integration tests.
//!
//! A small WebSocket server that accepts connections, records inbound text
//! frames (subscribe directives), and lets tests push event frames to every
//! connected client. A close-on-accept mode exercises the reconnect loop.

use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub struct MockHubServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    messages: Arc<Mutex<VecDeque<String>>>,
    connections: Arc<Mutex<Vec<Instant>>>,
    frame_tx: broadcast::Sender<String>,
    close_on_accept: bool,
}

impl MockHubServer {
    /// Start a server that keeps connections open.
    pub async fn start() -> Self {
        Self::start_inner(false).await
    }

    /// Start a server that closes every connection right after the handshake.
    pub async fn start_closing() -> Self {
        Self::start_inner(true).await
    }

    async fn start_inner(close_on_accept: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let messages: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
        let connections: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (frame_tx, _) = broadcast::channel::<String>(64);

        let messages_clone = messages.clone();
        let connections_clone = connections.clone();
        let frame_tx_clone = frame_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let messages = messages_clone.clone();
                        let connections = connections_clone.clone();
                        let frame_rx = frame_tx_clone.subscribe();
                        tokio::spawn(handle_connection(
                            stream,
                            messages,
                            connections,
                            frame_rx,
                            close_on_accept,
                        ));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            messages,
            connections,
            frame_tx,
            close_on_accept,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Number of connections accepted so far.
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Accept timestamps, in order.
    pub async fn connection_times(&self) -> Vec<Instant> {
        self.connections.lock().await.clone()
    }

    /// All text frames received from clients.
    pub async fn received_messages(&self) -> Vec<String> {
        self.messages.lock().await.iter().cloned().collect()
    }

    /// Push a text frame to every connected client.
    pub fn push_frame(&self, text: impl Into<String>) {
        assert!(!self.close_on_accept, "closing server keeps no clients");
        let _ = self.frame_tx.send(text.into());
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    messages: Arc<Mutex<VecDeque<String>>>,
    connections: Arc<Mutex<Vec<Instant>>>,
    mut frame_rx: broadcast::Receiver<String>,
    close_on_accept: bool,
) {
    {
        let mut conns = connections.lock().await;
        conns.push(Instant::now());
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    if close_on_accept {
        let _ = write.send(Message::Close(None)).await;
        return;
    }

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let mut msgs = messages.lock().await;
                        msgs.push_back(text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            frame = frame_rx.recv() => {
                match frame {
                    Ok(text) => {
                        if write.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        }
    }
}
