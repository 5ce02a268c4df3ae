//! WebSocket event stream client for the Ghost Broker hub.
//!
//! The hub pushes JSON frames shaped `{"type": <tag>, "data": <payload>}` over
//! a single WebSocket. This crate owns:
//! - Connection lifecycle with unconditional fixed-delay reconnect
//! - Channel subscription directives sent on each (re)connect
//! - Frame decoding into the closed [`WsEvent`] union

pub mod channel;
pub mod connection;
pub mod error;
pub mod event;

pub use channel::Channel;
pub use connection::{ConnectionConfig, ConnectionState, EventStreamClient};
pub use error::{WsError, WsResult};
pub use event::{
    decode_frame, BlockNotice, BurnNotice, LifecycleNotice, OrderBookUpdate, PriceUpdate,
    SubscribeRequest, WsEvent, WsFrame,
};
