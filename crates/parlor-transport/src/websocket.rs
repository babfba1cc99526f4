//! WebSocket transport implementation using `tokio-tungstenite`.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::{Connection, ConnectionId, Frame, FrameSink, FrameStream, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type Ws = WebSocketStream<TcpStream>;

fn io_error(kind: io::ErrorKind, err: tungstenite::Error) -> io::Error {
    io::Error::new(kind, err)
}

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds to `addr`. Port 0 picks a free port; see
    /// [`local_addr`](Transport::local_addr).
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        if let Ok(local) = listener.local_addr() {
            tracing::info!(addr = %local, "WebSocket transport listening");
        }
        Ok(Self { listener })
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| TransportError::Accept(io_error(io::ErrorKind::ConnectionRefused, e)))?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        Ok(WebSocketConnection { id, ws })
    }

    fn local_addr(&self) -> Result<SocketAddr, Self::Error> {
        self.listener.local_addr().map_err(TransportError::Bind)
    }
}

/// A single WebSocket connection, not yet split.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: Ws,
}

impl Connection for WebSocketConnection {
    type Sink = WsSink;
    type Stream = WsStream;

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn split(self) -> (WsSink, WsStream) {
        let (sink, stream) = self.ws.split();
        (WsSink { sink }, WsStream { stream })
    }
}

/// Write half of a [`WebSocketConnection`].
pub struct WsSink {
    sink: SplitSink<Ws, Message>,
}

impl FrameSink for WsSink {
    type Error = TransportError;

    async fn send(&mut self, frame: Vec<u8>) -> Result<(), Self::Error> {
        let msg = match String::from_utf8(frame) {
            Ok(text) => Message::Text(text.into()),
            Err(e) => Message::Binary(e.into_bytes().into()),
        };
        self.sink
            .send(msg)
            .await
            .map_err(|e| TransportError::Send(io_error(io::ErrorKind::BrokenPipe, e)))
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::Send(io_error(io::ErrorKind::BrokenPipe, e)))
    }
}

/// Read half of a [`WebSocketConnection`].
pub struct WsStream {
    stream: SplitStream<Ws>,
}

impl FrameStream for WsStream {
    type Error = TransportError;

    async fn recv(&mut self) -> Result<Option<Frame>, Self::Error> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(Frame::Data(text.as_bytes().to_vec())));
                }
                Some(Ok(Message::Binary(data))) => return Ok(Some(Frame::Data(data.to_vec()))),
                // tungstenite answers pings itself
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    return Ok(Some(Frame::Keepalive));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // raw frame
                Some(Ok(Message::Frame(_))) => continue,
                Some(Err(e)) => {
                    return Err(TransportError::Receive(io_error(
                        io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }
}
