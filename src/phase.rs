//! Turn and phase state machine, consulted before every match mutation.

use crate::common::{GameError, Slot};

/// Lifecycle phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than two players connected.
    Waiting,
    /// Both players connected, fleets being placed.
    Placement,
    /// Alternating attacks.
    Active,
    /// One fleet destroyed; a reset follows immediately.
    GameOver,
}

/// Legal transitions between waiting, placement, active play and game
/// over, plus the turn pointer and per-player placement sub-states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
    placement_done: [bool; 2],
    turn: Slot,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            placement_done: [false; 2],
            turn: Slot::One,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Slot currently authorized to attack. Meaningful only in `Active`.
    pub fn turn(&self) -> Slot {
        self.turn
    }

    pub fn placement_done(&self, slot: Slot) -> bool {
        self.placement_done[slot.index()]
    }

    /// Second session assigned: placement opens for both players.
    pub fn begin_placement(&mut self) {
        if self.phase == Phase::Waiting {
            self.phase = Phase::Placement;
        }
    }

    /// Check that `slot` may still place ships or finish placement.
    pub fn ensure_placing(&self, slot: Slot) -> Result<(), GameError> {
        match self.phase {
            Phase::Waiting => Err(GameError::WaitingForOpponent),
            Phase::Placement if self.placement_done(slot) => Err(GameError::PlacementOver),
            Phase::Placement => Ok(()),
            Phase::Active | Phase::GameOver => Err(GameError::PlacementOver),
        }
    }

    /// Flip `slot`'s placement sub-state to done. The caller has already
    /// verified fleet completeness.
    pub fn mark_placement_done(&mut self, slot: Slot) {
        self.placement_done[slot.index()] = true;
    }

    pub fn both_done(&self) -> bool {
        self.placement_done.iter().all(|&done| done)
    }

    /// Explicit start signal. Requires both placements done; on success
    /// the turn pointer is set to player 1.
    pub fn start(&mut self) -> Result<Slot, GameError> {
        if self.phase != Phase::Placement || !self.both_done() {
            return Err(GameError::CannotStart);
        }
        self.phase = Phase::Active;
        self.turn = Slot::One;
        Ok(self.turn)
    }

    /// Check that `slot` may attack right now.
    pub fn ensure_turn(&self, slot: Slot) -> Result<(), GameError> {
        if self.phase != Phase::Active {
            return Err(GameError::NotStarted);
        }
        if self.turn != slot {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Pass the turn to the opponent.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    /// A fleet was destroyed; the match is over.
    pub fn conclude(&mut self) {
        self.phase = Phase::GameOver;
    }

    /// Back to initial values: waiting, nobody done, player 1 to move.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
