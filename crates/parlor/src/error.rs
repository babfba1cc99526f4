//! Unified error type for the Parlor server.

use parlor_protocol::ProtocolError;
use parlor_room::RoomError;
use parlor_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` variants let `?` lift sub-crate errors without ceremony.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// Binding, accepting, or talking to a connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room rejected something or is gone.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Reading the content file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An environment setting could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
