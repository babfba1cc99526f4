//! Room actor: an isolated Tokio task that owns the [`Room`].
//!
//! Connection handlers never touch room state. They send [`RoomCommand`]s
//! through a bounded channel, and the actor applies them one at a time.
//! The live round timer is the other branch of the same `select!`, so
//! inbound events and timer firings can never interleave.

use std::collections::HashMap;

use parlor_protocol::{ClientEvent, GameMode, PlayerId, Recipient, ServerEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::{Room, RoomError};

/// Channel sender for delivering outbound events to one connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the room actor through its channel.
pub(crate) enum RoomCommand {
    /// A transport connection opened. It receives room-wide broadcasts
    /// from now on, joined or not.
    Connect {
        player_id: PlayerId,
        sender: PlayerSender,
    },

    /// The connection closed. Counts as leaving the roster.
    Disconnect { player_id: PlayerId },

    /// An event decoded from the connection.
    Event {
        sender: PlayerId,
        event: ClientEvent,
    },

    GetInfo { reply: oneshot::Sender<RoomInfo> },

    Shutdown,
}

/// A snapshot of room metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    /// Players in the roster.
    pub player_count: usize,
    pub host: Option<PlayerId>,
    /// The live mode, `None` in the lobby.
    pub mode: Option<GameMode>,
    /// Open connections, joined or not.
    pub connections: usize,
}

/// Handle to the running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Registers a connection's outbound channel.
    pub async fn connect(&self, player_id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        self.send(RoomCommand::Connect { player_id, sender }).await
    }

    /// Unregisters a connection and removes it from the roster.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { player_id }).await
    }

    /// Delivers a client event (fire-and-forget).
    pub async fn send_event(&self, sender: PlayerId, event: ClientEvent) -> Result<(), RoomError> {
        self.send(RoomCommand::Event { sender, event }).await
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the actor to stop. Pending timers die with it.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| RoomError::Unavailable)
    }
}

struct RoomActor {
    room: Room,
    /// Every open connection, joined or not.
    clients: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs until shutdown or until every handle is dropped.
    async fn run(mut self) {
        info!("room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(RoomCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                expiry = self.room.next_expiry() => self.room.on_timer(expiry),
            }
            self.flush();
        }

        info!("room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Connect { player_id, sender } => {
                debug!(%player_id, "connection registered");
                self.clients.insert(player_id, sender);
            }
            RoomCommand::Disconnect { player_id } => {
                debug!(%player_id, "connection closed");
                self.clients.remove(&player_id);
                self.room.leave(player_id);
            }
            RoomCommand::Event { sender, event } => self.room.handle(sender, event),
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown => {}
        }
    }

    /// Delivers everything the room queued. A closed receiver just means
    /// the connection is on its way out.
    fn flush(&mut self) {
        for (to, event) in self.room.drain_outbox() {
            match to {
                Recipient::Player(id) => {
                    if let Some(sender) = self.clients.get(&id) {
                        let _ = sender.send(event);
                    }
                }
                _ => {
                    for (id, sender) in &self.clients {
                        if to.includes(*id) {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }

    fn info(&self) -> RoomInfo {
        let roster = self.room.roster();
        RoomInfo {
            player_count: roster.count(),
            host: roster.find_host().map(|p| p.id),
            mode: self.room.active_mode(),
            connections: self.clients.len(),
        }
    }
}

/// Spawns the room actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub fn spawn_room(room: Room, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let actor = RoomActor {
        room,
        clients: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());
    RoomHandle { sender: tx }
}
