//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Tunables for the room and its three mini-games.
///
/// Defaults reproduce the classic party-room rules: three players minimum,
/// 60 s drawing rounds (two turns per player), ten 15 s quiz questions,
/// and two minutes of spy discussion before the vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Players needed to start a game, and to keep one running.
    pub min_players: usize,

    /// Shortest accepted display name, counted in visible characters.
    pub min_name_chars: usize,

    /// Longest accepted display name, counted in characters. `None`
    /// accepts any length.
    pub max_name_chars: Option<usize>,

    /// Length of one drawing round.
    pub draw_round: Duration,

    /// Drawing turns per player; total rounds = players × this.
    pub draw_rounds_per_player: usize,

    /// Length of one quiz question.
    pub quiz_round: Duration,

    /// Questions per quiz game.
    pub quiz_rounds: u32,

    /// Free discussion before the spy vote opens.
    pub discussion: Duration,

    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            min_name_chars: 2,
            max_name_chars: None,
            draw_round: Duration::from_secs(60),
            draw_rounds_per_player: 2,
            quiz_round: Duration::from_secs(15),
            quiz_rounds: 10,
            discussion: Duration::from_secs(120),
            seed: None,
        }
    }
}

impl RoomConfig {
    /// Smallest room any mode can run in: a drawer and two guessers, or a
    /// spy and two civilians.
    pub const MIN_PLAYERS_FLOOR: usize = 3;

    /// Clamp and fix out-of-range values so the config is safe to use.
    ///
    /// Called by `Room::new`. Rules:
    /// - `min_players` raised to [`Self::MIN_PLAYERS_FLOOR`].
    /// - `min_name_chars` at least 1, a set `max_name_chars` at least `min_name_chars`.
    /// - Round counts at least 1; zero-length rounds raised to 1 s.
    pub fn validated(mut self) -> Self {
        if self.min_players < Self::MIN_PLAYERS_FLOOR {
            warn!(
                min_players = self.min_players,
                floor = Self::MIN_PLAYERS_FLOOR,
                "min_players below floor, raising"
            );
            self.min_players = Self::MIN_PLAYERS_FLOOR;
        }
        self.min_name_chars = self.min_name_chars.max(1);
        let min_name_chars = self.min_name_chars;
        self.max_name_chars = self.max_name_chars.map(|max| max.max(min_name_chars));
        self.draw_rounds_per_player = self.draw_rounds_per_player.max(1);
        self.quiz_rounds = self.quiz_rounds.max(1);
        for round in [
            &mut self.draw_round,
            &mut self.quiz_round,
            &mut self.discussion,
        ] {
            if round.is_zero() {
                *round = Duration::from_secs(1);
            }
        }
        self
    }
}
