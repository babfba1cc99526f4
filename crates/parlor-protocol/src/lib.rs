//! Wire protocol for Parlor.
//!
//! This crate defines the "language" that the browser client and the room
//! server speak:
//!
//! - **Types** ([`PlayerId`], [`Recipient`], [`Player`], [`GameMode`], …):
//!   identities and values carried inside events.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): the full inbound and
//!   outbound event surface.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events are converted
//!   to and from frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frames) → Protocol (events) → Room (game state)
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{GameMode, Player, PlayerId, Recipient, ScoreEntry, Stroke, UnknownGameMode};
