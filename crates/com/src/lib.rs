//! JSON-over-WebSocket publish/subscribe.
//!
//! `WsServer` broadcasts every message to all connected clients and merges
//! whatever the clients send into a single receive queue. Messages travel as
//! JSON text frames, so a browser `WebSocket` can talk to it directly.

pub mod error;
pub mod ws;

pub use error::ComError;
pub use ws::{WsClient, WsServer};
