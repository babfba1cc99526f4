//! Per-player scores for one game.

use parlor_protocol::{PlayerId, ScoreEntry};

/// Scores in insertion order.
///
/// Insertion order is part of the contract: [`leader`](Self::leader) breaks
/// ties in favour of the earliest entry, and the ordered list is what goes on
/// the wire. Rooms are small, so a `Vec` beats a map here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// A board with every given player at zero, in the given order.
    pub fn for_players(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut board = Self::default();
        for id in ids {
            board.ensure(id);
        }
        board
    }

    /// Adds a zero entry for `id` if it has none.
    pub fn ensure(&mut self, id: PlayerId) {
        if self.get(id).is_none() {
            self.entries.push(ScoreEntry {
                player_id: id,
                score: 0,
            });
        }
    }

    /// Adds points (creating the entry if needed) and returns the new total.
    pub fn add(&mut self, id: PlayerId, points: u32) -> u32 {
        self.ensure(id);
        match self.entries.iter_mut().find(|e| e.player_id == id) {
            Some(entry) => {
                entry.score = entry.score.saturating_add(points);
                entry.score
            }
            None => 0,
        }
    }

    pub fn remove(&mut self, id: PlayerId) {
        self.entries.retain(|e| e.player_id != id);
    }

    pub fn get(&self, id: PlayerId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.player_id == id)
            .map(|e| e.score)
    }

    /// The entry with the strictly highest score; ties go to the earliest
    /// inserted. `None` for an empty board.
    pub fn leader(&self) -> Option<ScoreEntry> {
        self.entries.iter().fold(None, |best: Option<ScoreEntry>, e| match best {
            Some(b) if b.score >= e.score => Some(b),
            _ => Some(*e),
        })
    }

    /// Snapshot for the wire.
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
