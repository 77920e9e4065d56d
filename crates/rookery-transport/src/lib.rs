//! Network transport for Rookery.
//!
//! The server never touches sockets directly. It accepts [`Connection`]s
//! from a [`Transport`] and moves opaque byte frames over them; what the
//! bytes mean is the protocol crate's business.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Identifies a connection in logs, from accept to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener that hands out one [`Connection`] per client.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Waits for the next client and completes its handshake.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single client connection carrying whole frames.
///
/// `send` and `recv` may be called concurrently from different tasks:
/// a pending `recv` never holds up a `send`.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes one frame to the client.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Waits for the next data frame from the client. Control frames are
    /// handled underneath and never returned.
    ///
    /// `Ok(None)` means the client closed the connection.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts a clean close.
    async fn close(&self) -> Result<(), Self::Error>;

    /// The identifier used for this connection in logs.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_transport_error_display_keeps_source_message() {
        let err = TransportError::BindFailed(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        assert_eq!(err.to_string(), "bind failed: port taken");
    }
}
