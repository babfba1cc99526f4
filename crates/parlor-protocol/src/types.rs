//! Identity and value types shared by inbound and outbound events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque identifier for a connected player.
///
/// One per connection: the server derives it from the transport's
/// connection id, so a client that leaves and rejoins on the same socket
/// keeps its id. `#[serde(transparent)]` puts a bare number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive an event?
// ---------------------------------------------------------------------------

/// Addressing for an outbound event.
///
/// These are the three delivery primitives the room needs from the
/// transport layer: one client, every client, or every client but the
/// sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected client, joined or not.
    All,

    /// A single client.
    Player(PlayerId),

    /// Every connected client except this one.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if a client with this id should receive the event.
    pub fn includes(&self, player_id: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(id) => *id == player_id,
            Self::AllExcept(id) => *id != player_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Roster entry
// ---------------------------------------------------------------------------

/// A joined player as it appears in roster broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
}

// ---------------------------------------------------------------------------
// GameMode
// ---------------------------------------------------------------------------

/// The three mini-games a host can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Drawing / guessing.
    #[serde(rename = "quickdraw")]
    QuickDraw,
    /// Multiple-choice quiz.
    #[serde(rename = "trivia")]
    Trivia,
    /// Hidden-role social deduction.
    #[serde(rename = "spy")]
    Spy,
}

impl GameMode {
    /// The wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickDraw => "quickdraw",
            Self::Trivia => "trivia",
            Self::Spy => "spy",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a start request names a mode that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode: {0:?}")]
pub struct UnknownGameMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownGameMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quickdraw" => Ok(Self::QuickDraw),
            "trivia" => Ok(Self::Trivia),
            "spy" => Ok(Self::Spy),
            other => Err(UnknownGameMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Scores and strokes
// ---------------------------------------------------------------------------

/// One line of a scoreboard. Score lists travel as ordered arrays so that
/// the winner tie-break (earliest entry) is visible to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_id: PlayerId,
    pub score: u32,
}

/// A single canvas segment. Coordinates are normalized to `0.0..=1.0` so
/// clients with different canvas sizes render the same picture. The
/// server relays strokes untouched and keeps no canvas state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: String,
    pub size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_recipient_includes() {
        let a = PlayerId(1);
        let b = PlayerId(2);
        assert!(Recipient::All.includes(a));
        assert!(Recipient::Player(a).includes(a));
        assert!(!Recipient::Player(a).includes(b));
        assert!(!Recipient::AllExcept(a).includes(a));
        assert!(Recipient::AllExcept(a).includes(b));
    }

    #[test]
    fn test_player_uses_camel_case_fields() {
        let player = Player {
            id: PlayerId(5),
            name: "Minh".into(),
            is_host: true,
        };
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["name"], "Minh");
        assert_eq!(json["isHost"], true);
    }

    #[test]
    fn test_game_mode_parses_wire_names() {
        assert_eq!("quickdraw".parse::<GameMode>(), Ok(GameMode::QuickDraw));
        assert_eq!("trivia".parse::<GameMode>(), Ok(GameMode::Trivia));
        assert_eq!("spy".parse::<GameMode>(), Ok(GameMode::Spy));
        assert_eq!(
            "chess".parse::<GameMode>(),
            Err(UnknownGameMode("chess".into()))
        );
    }

    #[test]
    fn test_game_mode_serde_matches_display() {
        for mode in [GameMode::QuickDraw, GameMode::Trivia, GameMode::Spy] {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, mode.to_string());
        }
    }

    #[test]
    fn test_score_entry_json_format() {
        let entry = ScoreEntry {
            player_id: PlayerId(9),
            score: 180,
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["playerId"], 9);
        assert_eq!(json["score"], 180);
    }
}
