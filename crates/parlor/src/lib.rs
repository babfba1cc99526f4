//! # Parlor
//!
//! A single-room party game server. Browser clients connect over
//! WebSocket, join the roster, and the host picks one of three modes:
//! a drawing-and-guessing game, a timed trivia quiz, or a spy deduction
//! round.
//!
//! The room itself lives in one actor task (see [`parlor_room`]); this
//! crate binds the listener, runs one handler task per connection, and
//! ships the `parlor-server` binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! # async fn start() -> Result<(), ParlorError> {
//! let server = ParlorServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .room_config(RoomConfig {
//!         quiz_rounds: 5,
//!         ..RoomConfig::default()
//!     })
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

pub mod prelude {
    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder, ServerConfig};
    pub use parlor_protocol::{ClientEvent, GameMode, PlayerId, ServerEvent};
    pub use parlor_room::{ContentPack, RoomConfig, RoomHandle, RoomInfo, TriviaQuestion};
}
