//! Common types for the match server: player slots, board coordinates and
//! game errors.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ship::ShipType;

/// One of the two fixed player identities for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    /// The other player.
    pub fn opponent(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    /// Player number as shown to clients (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    /// Zero-based index for per-slot storage.
    pub fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A cell on the board. Ordering sorts by row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors returned by match state operations. Every variant is a
/// recoverable guard rejection reported to the originating session only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// A ship of this type is already placed by the player.
    ShipAlreadyPlaced(ShipType),
    /// Placement is out of bounds or collides with the player's own fleet.
    InvalidPlacement(ShipType),
    /// Fewer than five ships placed, or the fleet fails shape validation.
    IncompleteFleet,
    /// The player's placement phase is already over.
    PlacementOver,
    /// Placement requires both players to be connected.
    WaitingForOpponent,
    /// Start requires both players to have finished placing.
    CannotStart,
    /// The game has not started yet.
    NotStarted,
    /// Action issued by the player not holding the turn.
    NotYourTurn,
    /// This coordinate was already attacked.
    AlreadyAttacked,
    /// Both player slots are occupied.
    MatchFull,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ShipAlreadyPlaced(ship) => write!(f, "{} is already placed", ship),
            GameError::InvalidPlacement(ship) => write!(f, "invalid placement for {}", ship),
            GameError::IncompleteFleet => write!(f, "fleet is incomplete"),
            GameError::PlacementOver => write!(f, "placement phase already completed"),
            GameError::WaitingForOpponent => write!(f, "waiting for an opponent to join"),
            GameError::CannotStart => write!(f, "both players must finish placing first"),
            GameError::NotStarted => write!(f, "game hasn't started yet"),
            GameError::NotYourTurn => write!(f, "not your turn"),
            GameError::AlreadyAttacked => write!(f, "coordinate already attacked"),
            GameError::MatchFull => write!(f, "no free player slot"),
        }
    }
}

impl std::error::Error for GameError {}
