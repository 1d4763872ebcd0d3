//! Session directory: bidirectional mapping between live connections and
//! the two player slots.

use core::fmt;

use crate::common::{GameError, Slot};

/// Identifier for one live client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// At most two concurrent sessions, each bound to a unique player slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDirectory {
    slots: [Option<SessionId>; 2],
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the lowest free slot, slot 1 first. Fails when both slots
    /// are occupied, signaling the caller to reject the connection.
    pub fn assign(&mut self, session: SessionId) -> Result<Slot, GameError> {
        for slot in [Slot::One, Slot::Two] {
            if self.slots[slot.index()].is_none() {
                self.slots[slot.index()] = Some(session);
                return Ok(slot);
            }
        }
        Err(GameError::MatchFull)
    }

    pub fn resolve(&self, session: SessionId) -> Option<Slot> {
        [Slot::One, Slot::Two]
            .into_iter()
            .find(|slot| self.slots[slot.index()] == Some(session))
    }

    pub fn reverse_resolve(&self, slot: Slot) -> Option<SessionId> {
        self.slots[slot.index()]
    }

    /// Remove the mapping for `session`, returning the freed slot.
    /// Idempotent: unknown sessions are ignored.
    pub fn release(&mut self, session: SessionId) -> Option<Slot> {
        let slot = self.resolve(session)?;
        self.slots[slot.index()] = None;
        Some(slot)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == 2
    }
}
