//! Error types for the protocol layer.
//!
//! Each crate in Parlor defines its own error enum. A `ProtocolError`
//! always means a frame could not be turned into an event (or back),
//! never that the room or the network misbehaved.

/// Errors that can occur while encoding or decoding wire events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into an event).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, or a
    /// payload whose fields do not match the event.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but is not a valid event.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
