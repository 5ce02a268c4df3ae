//! Event stream client integration tests.
//!
//! Covers the connection lifecycle against a mock hub:
//! - Subscribe directives on connect
//! - Event decoding and forwarding
//! - Malformed frame tolerance
//! - Fixed-delay reconnection

mod common;
use common::MockHubServer;

use ghost_ws::{Channel, ConnectionConfig, ConnectionState, EventStreamClient, WsEvent};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn client_for(
    url: String,
    channels: Vec<Channel>,
    delay_ms: u64,
) -> (Arc<EventStreamClient>, mpsc::Receiver<WsEvent>) {
    let (event_tx, event_rx) = mpsc::channel(100);
    let config = ConnectionConfig {
        url,
        channels,
        reconnect_delay_ms: delay_ms,
    };
    (Arc::new(EventStreamClient::new(config, event_tx)), event_rx)
}

#[tokio::test]
async fn test_subscribes_each_channel_on_connect() {
    let server = MockHubServer::start().await;
    let (client, _event_rx) = client_for(
        server.url(),
        vec![Channel::new(Channel::TRADES), Channel::new(Channel::BLOCK)],
        5000,
    );

    let runner = client.clone();
    let handle = tokio::spawn(async move {
        let _ = runner.run().await;
    });

    let messages = timeout(Duration::from_secs(2), async {
        loop {
            let messages = server.received_messages().await;
            if messages.len() >= 2 {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("subscribe directives should arrive within timeout");

    assert_eq!(messages[0], r#"{"subscribe":"market.trades"}"#);
    assert_eq!(messages[1], r#"{"subscribe":"chain.block"}"#);

    client.shutdown();
    handle.abort();
    server.shutdown().await;
}

#[tokio::test]
async fn test_empty_channel_list_is_noop() {
    let server = MockHubServer::start().await;
    let (client, _event_rx) = client_for(server.url(), vec![], 5000);

    let result = timeout(Duration::from_secs(2), client.run())
        .await
        .expect("run should return promptly with no channels");
    assert!(result.is_ok());

    // No connection was ever attempted
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.connection_count().await, 0);
    assert_eq!(client.state(), ConnectionState::Disconnected);

    server.shutdown().await;
}

#[tokio::test]
async fn test_forwards_decoded_events() {
    let server = MockHubServer::start().await;
    let (client, mut event_rx) =
        client_for(server.url(), vec![Channel::new(Channel::TRADES)], 5000);

    let runner = client.clone();
    let handle = tokio::spawn(async move {
        let _ = runner.run().await;
    });

    // Wait for the subscribe directive so we know a client is attached
    timeout(Duration::from_secs(2), async {
        while server.received_messages().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();

    server.push_frame(
        json!({
            "type": "trade",
            "data": {
                "bid_order_id": "b1",
                "ask_order_id": "a1",
                "agent_bid": 4,
                "agent_ask": 5,
                "commodity": "ETH",
                "matched_qty": "1.0",
                "matched_price": "1800.0",
                "fee_burned": "500",
                "block_number": 12,
                "timestamp": 1700000000
            }
        })
        .to_string(),
    );

    let event = timeout(Duration::from_secs(2), event_rx.recv())
        .await
        .expect("event should arrive within timeout")
        .expect("channel open");

    match event {
        WsEvent::Trade(trade) => {
            assert_eq!(trade.agent_bid, 4);
            assert_eq!(trade.block_number, 12);
        }
        other => panic!("expected trade event, got {}", other.tag()),
    }

    client.shutdown();
    handle.abort();
    server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_frame_does_not_drop_connection() {
    let server = MockHubServer::start().await;
    let (client, mut event_rx) =
        client_for(server.url(), vec![Channel::new(Channel::BLOCK)], 5000);

    let runner = client.clone();
    let handle = tokio::spawn(async move {
        let _ = runner.run().await;
    });

    timeout(Duration::from_secs(2), async {
        while server.received_messages().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();

    // Garbage, an unknown tag, then a valid frame
    server.push_frame("{not valid json");
    server.push_frame(json!({"type": "governance", "data": {}}).to_string());
    server.push_frame(json!({"type": "block", "data": {"block_number": 55, "tps": 3.2}}).to_string());

    let event = timeout(Duration::from_secs(2), event_rx.recv())
        .await
        .expect("valid frame should still be delivered")
        .expect("channel open");

    match event {
        WsEvent::Block(block) => assert_eq!(block.block_number, 55),
        other => panic!("expected block event, got {}", other.tag()),
    }

    // Still the original connection
    assert_eq!(server.connection_count().await, 1);

    client.shutdown();
    handle.abort();
    server.shutdown().await;
}

#[tokio::test]
async fn test_reconnects_on_fixed_delay() {
    let server = MockHubServer::start_closing().await;
    let (client, _event_rx) = client_for(server.url(), vec![Channel::new(Channel::BLOCK)], 100);

    let runner = client.clone();
    let handle = tokio::spawn(async move {
        let _ = runner.run().await;
    });

    timeout(Duration::from_secs(5), async {
        while server.connection_count().await < 3 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("client should keep reconnecting");

    // Gaps between attempts track the configured fixed delay, no backoff
    let times = server.connection_times().await;
    for pair in times.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(gap >= Duration::from_millis(90), "gap too short: {:?}", gap);
        assert!(gap < Duration::from_millis(2000), "gap too long: {:?}", gap);
    }

    client.shutdown();
    handle.abort();
    server.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_exits_retry_loop() {
    // Nothing listening on this port
    let (client, _event_rx) = client_for(
        "ws://127.0.0.1:59999".to_string(),
        vec![Channel::new(Channel::BLOCK)],
        100,
    );

    let runner = client.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(client.reconnect_count() >= 1, "should have retried");

    client.shutdown();
    let result = timeout(Duration::from_secs(2), handle)
        .await
        .expect("run should exit promptly after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
