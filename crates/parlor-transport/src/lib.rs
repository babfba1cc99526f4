//! Transport abstraction layer for Parlor.
//!
//! The room only needs to push frames to one client and read frames from
//! it. A [`Transport`] accepts [`Connection`]s; each connection splits into
//! a [`FrameSink`] (written by a dedicated writer task) and a
//! [`FrameStream`] (read by the connection handler), so reading never
//! blocks writing.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport, WsSink, WsStream};

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;

/// Opaque identifier for a connection, unique per process.
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

/// One inbound item from a [`FrameStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text or binary payload.
    Data(Vec<u8>),
    /// A ping or pong. Carries nothing but proves the peer is alive.
    Keepalive,
}

/// Accepts new incoming connections.
pub trait Transport: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Waits for and accepts the next incoming connection.
    fn accept(&mut self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// The address the transport is listening on.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// An accepted connection, before it is split into halves.
pub trait Connection: Send + 'static {
    type Sink: FrameSink;
    type Stream: FrameStream;

    fn id(&self) -> ConnectionId;

    /// Splits into independently owned write and read halves.
    fn split(self) -> (Self::Sink, Self::Stream);
}

/// The write half of a connection.
pub trait FrameSink: Send + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one frame. UTF-8 payloads go out as text frames.
    fn send(&mut self, frame: Vec<u8>) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Starts a clean close.
    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// The read half of a connection.
pub trait FrameStream: Send + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receives the next frame. Pings and pongs surface as
    /// [`Frame::Keepalive`].
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly.
    fn recv(&mut self) -> impl Future<Output = Result<Option<Frame>, Self::Error>> + Send;
}
