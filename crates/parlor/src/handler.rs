//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]:
//!   1. Register an outbound channel with the room actor
//!   2. Spawn a writer task that encodes room events onto the sink
//!   3. Loop: read frames, decode client events, forward them to the room
//!
//! Leaving the loop for any reason counts as a disconnect. With an idle
//! timeout configured, a peer that sends neither events nor pings for that
//! long is dropped.

use std::sync::Arc;

use parlor_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use parlor_room::RoomHandle;
use parlor_transport::{Connection, Frame, FrameSink, FrameStream};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::server::ServerState;

/// Tells the room the connection is gone when the handler exits.
///
/// `Drop` is synchronous, so the disconnect is sent from a spawned task.
/// Fires on early returns and panics too.
struct ConnectionGuard {
    player_id: PlayerId,
    room: RoomHandle,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let room = self.room.clone();
        tokio::spawn(async move {
            if let Err(e) = room.disconnect(player_id).await {
                tracing::debug!(%player_id, error = %e, "disconnect not delivered");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<Conn, C>(
    conn: Conn,
    state: Arc<ServerState<C>>,
) -> Result<(), ParlorError>
where
    Conn: Connection,
    C: Codec,
{
    let player_id = PlayerId(conn.id().into_inner());
    let (sink, mut stream) = conn.split();
    tracing::debug!(%player_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    state.room.connect(player_id, tx).await?;
    let _guard = ConnectionGuard {
        player_id,
        room: state.room.clone(),
    };

    tokio::spawn(write_events(player_id, sink, rx, Arc::clone(&state)));

    loop {
        let received = match state.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, stream.recv()).await,
            None => Ok(stream.recv().await),
        };
        let data = match received {
            Ok(Ok(Some(Frame::Data(data)))) => data,
            // Any frame, pings included, restarts the idle clock.
            Ok(Ok(Some(Frame::Keepalive))) => continue,
            Ok(Ok(None)) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%player_id, "connection idle, closing");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode client event");
                continue;
            }
        };

        state.room.send_event(player_id, event).await?;
    }

    // _guard drops here → room disconnect fires.
    Ok(())
}

/// Drains the connection's outbound channel onto the sink.
///
/// Ends when the room drops the sender (after disconnect) or the peer
/// stops accepting frames.
async fn write_events<S, C>(
    player_id: PlayerId,
    mut sink: S,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<C>>,
) where
    S: FrameSink,
    C: Codec,
{
    while let Some(event) = rx.recv().await {
        let frame = match state.codec.encode(&event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "failed to encode server event");
                continue;
            }
        };
        if let Err(e) = sink.send(frame).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping writer");
            return;
        }
    }
    let _ = sink.close().await;
}
