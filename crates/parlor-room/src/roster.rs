//! The roster: who is in the room, in join order, and who hosts.

use parlor_protocol::{Player, PlayerId};

use crate::RoomError;

/// Joined players in join order.
///
/// Invariants, held after every public call:
/// - no duplicate ids;
/// - exactly one host while non-empty, none while empty;
/// - the host is always `players[0]`, the earliest-joined player still here.
///   Host reassignment never reorders the list.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a player. The first player into an empty roster becomes host.
    ///
    /// `name` is trimmed; it must hold at least `min_chars` visible
    /// characters and, when `max_chars` is set, at most that many characters.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyJoined`] if `id` is already present.
    /// - [`RoomError::InvalidName`] if the name is too short.
    /// - [`RoomError::NameTooLong`] if the name exceeds `max_chars`.
    pub fn join(
        &mut self,
        id: PlayerId,
        name: &str,
        min_chars: usize,
        max_chars: Option<usize>,
    ) -> Result<&Player, RoomError> {
        if self.contains(id) {
            return Err(RoomError::AlreadyJoined(id));
        }
        let name = name.trim();
        let visible = name
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .count();
        if visible < min_chars {
            return Err(RoomError::InvalidName { min: min_chars });
        }
        if let Some(max) = max_chars.filter(|&max| name.chars().count() > max) {
            return Err(RoomError::NameTooLong { max });
        }

        let is_host = self.players.is_empty();
        self.players.push(Player {
            id,
            name: name.to_string(),
            is_host,
        });
        Ok(&self.players[self.players.len() - 1])
    }

    /// Removes a player. Returns `None` (and changes nothing) if absent.
    ///
    /// If the host leaves, the earliest-joined remaining player takes over.
    pub fn leave(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(index);
        if removed.is_host {
            if let Some(next) = self.players.first_mut() {
                next.is_host = true;
            }
        }
        Some(removed)
    }

    pub fn find_host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_host(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.is_host)
    }

    pub fn count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Ids in join order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }
}
