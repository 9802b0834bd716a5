//! Transport abstraction layer for Duelhall.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the byte stream a game client is attached to, plus the line-framed TCP
//! implementation ([`TcpTransport`], [`TcpConnection`]) the server runs on.
//!
//! # Framing
//!
//! Every message in both directions is one line of text terminated by
//! `\n`. [`Connection::recv`] hands back one line at a time (without the
//! terminator), and [`Connection::send`] writes whatever bytes it is given
//! in full. Higher layers (the protocol codec) own the newline on the way
//! out.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{DEFAULT_MAX_FRAME_LEN, TcpConnection, TcpTransport};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive framed messages.
///
/// Methods return `Send` futures (rather than using `async fn`) so that
/// generic code, such as the session actor, can hold a `C: Connection`
/// across `.await` points inside a `tokio::spawn`ed task.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends data to the remote peer.
    ///
    /// Partial writes are retried until every byte is written or the
    /// connection reports an error.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(&self) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the sending side of the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
