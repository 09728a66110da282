//! Byte transport between domino players and the server.
//!
//! The server accepts through a [`Transport`]; each player then talks over
//! one [`Connection`]. Reads and writes on a connection are locked
//! separately, so the per-player send loop can push updates while the
//! receive loop sits in `recv`.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`,
//!   plus [`connect`] for clients

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{connect, ClientConnection, WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Process-unique tag for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out player connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next player to connect.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// One player's message stream.
///
/// `send` and `recv` may run concurrently from different tasks; each
/// message is delivered whole.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Next message from the peer, or `Ok(None)` after a clean close.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;
}
