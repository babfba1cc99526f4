//! Room orchestration for Parlor.
//!
//! One shared room, three mini-games. The room runs as a single Tokio task
//! (actor model) that owns the roster, the live game, and its round timer.
//!
//! # Key types
//!
//! - [`Room`]: the synchronous aggregate (roster, live mode, outbox)
//! - [`RoomHandle`]: sends commands to the running room actor
//! - [`Roster`] / [`Scoreboard`]: join order, host, and scores
//! - [`RoomConfig`] / [`ContentPack`]: rules and the word, question, and
//!   location lists the games sample from

mod actor;
mod config;
mod content;
mod error;
mod modes;
mod outbox;
mod room;
mod roster;
mod scoreboard;

pub use actor::{PlayerSender, RoomHandle, RoomInfo, spawn_room};
pub use config::RoomConfig;
pub use content::{ContentPack, TriviaQuestion};
pub use error::RoomError;
pub use room::{LOBBY_RETURN_MESSAGE, Room};
pub use roster::Roster;
pub use scoreboard::Scoreboard;
