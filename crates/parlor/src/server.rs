//! `ParlorServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → room actor.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parlor_protocol::{Codec, JsonCodec};
use parlor_room::{ContentPack, Room, RoomConfig, RoomHandle, spawn_room};
use parlor_transport::{Transport, WebSocketTransport};

use crate::ParlorError;
use crate::handler::handle_connection;

/// Capacity of the room actor's command queue.
const ROOM_CHANNEL_SIZE: usize = 256;

/// State shared by every connection task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) room: RoomHandle,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// use parlor::prelude::*;
///
/// # async fn start() -> Result<(), ParlorError> {
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    content: ContentPack,
    idle_timeout: Option<Duration>,
}

impl ParlorServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_config: RoomConfig::default(),
            content: ContentPack::default(),
            idle_timeout: None,
        }
    }

    /// Sets the address to bind to. Port 0 picks a free port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Replaces the built-in words, questions, and locations.
    pub fn content(mut self, content: ContentPack) -> Self {
        self.content = content;
        self
    }

    /// Closes connections that send no frame, not even a ping, for
    /// `timeout`. Off by default: browsers do not ping on their own.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Validates the room setup, spawns the room actor, and binds.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<ParlorServer<JsonCodec>, ParlorError> {
        let room = Room::new(self.room_config, self.content)?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let room = spawn_room(room, ROOM_CHANNEL_SIZE);

        let state = Arc::new(ServerState {
            room,
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Parlor server. Call [`run()`](Self::run) to start accepting.
pub struct ParlorServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl ParlorServer<JsonCodec> {
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }
}

impl<C: Codec> ParlorServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ParlorError> {
        Ok(self.transport.local_addr()?)
    }

    /// Handle to the room actor, for inspection or shutdown.
    pub fn room(&self) -> RoomHandle {
        self.state.room.clone()
    }

    /// Runs the accept loop, spawning one handler task per connection.
    ///
    /// Accept failures (a botched handshake, say) are logged and the
    /// loop keeps going. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
