//! Error types for the room layer.

use parlor_protocol::{GameMode, PlayerId};

/// Errors that can occur during room operations.
///
/// None of these are fatal: a rejected request leaves the room exactly as
/// it was. [`is_user_facing`](Self::is_user_facing) decides whether the
/// requester is told about it.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Display name has too few visible characters.
    #[error("name must have at least {min} visible characters")]
    InvalidName { min: usize },

    /// Display name exceeds the configured cap.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },

    /// The connection is already in the roster.
    #[error("player {0} already joined")]
    AlreadyJoined(PlayerId),

    /// The connection has not joined the roster.
    #[error("player {0} has not joined")]
    NotJoined(PlayerId),

    /// Only the host may start a game.
    #[error("player {0} is not the host")]
    NotHost(PlayerId),

    /// The requested mode name is not one of the known modes.
    #[error("unknown game mode: {0:?}")]
    UnknownMode(String),

    /// A mode is already running.
    #[error("{0} is already running")]
    AlreadyRunning(GameMode),

    /// Fewer players than the configured minimum.
    #[error("need at least {need} players to start, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// The word list, question bank, or location list cannot be used.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// The room actor's command channel is full or closed.
    #[error("room is unavailable")]
    Unavailable,
}

impl RoomError {
    /// Whether the requesting client should receive an `error` event.
    ///
    /// Name and player-count problems are things the user can fix; the rest
    /// (non-host start, unknown mode, duplicate join) are dropped quietly.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::NameTooLong { .. } | Self::NotEnoughPlayers { .. }
        )
    }
}
