//! Pure board model: per-player fleets, placement validation and hit
//! detection. No state of its own beyond the data it is given.

use crate::common::Coord;
use crate::config::{BOARD_SIZE, FLEET_TYPES, NUM_SHIPS};
use crate::ship::ShipType;

/// The set of ships one player has placed so far, keyed by ship type.
/// Each ship is the ordered list of cells it occupies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    ships: [Option<Vec<Coord>>; NUM_SHIPS],
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells of the given ship, if placed.
    pub fn get(&self, ship: ShipType) -> Option<&[Coord]> {
        self.ships[ship.index()].as_deref()
    }

    /// True if a ship of this type is already placed.
    pub fn contains(&self, ship: ShipType) -> bool {
        self.ships[ship.index()].is_some()
    }

    /// Record a ship. The caller has already validated the placement.
    pub fn insert(&mut self, ship: ShipType, positions: Vec<Coord>) {
        self.ships[ship.index()] = Some(positions);
    }

    /// Number of ships placed so far.
    pub fn placed_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_some()).count()
    }

    /// Every occupied cell across the fleet.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.ships.iter().flatten().flatten().copied()
    }

    /// Total number of cells across all placed ships.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().flatten().map(Vec::len).sum()
    }

    /// Placed ships in fleet order.
    pub fn ships(&self) -> impl Iterator<Item = (ShipType, &[Coord])> + '_ {
        FLEET_TYPES
            .iter()
            .filter_map(move |&ship| self.get(ship).map(|positions| (ship, positions)))
    }

    /// Remove every placed ship.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// True iff the coordinate lies on the board.
pub fn in_bounds(coord: Coord) -> bool {
    coord.row < BOARD_SIZE && coord.col < BOARD_SIZE
}

/// Placement-time check: at least one cell, every cell in-bounds and none
/// colliding with a cell already occupied by this player's fleet. Shape is
/// not checked here; `fleet_complete` enforces it at fleet acceptance.
pub fn validate_placement(positions: &[Coord], fleet: &Fleet) -> bool {
    !positions.is_empty()
        && positions.iter().all(|&p| in_bounds(p))
        && !positions.iter().any(|&p| fleet.cells().any(|c| c == p))
}

/// True iff the coordinate belongs to any ship in the defender's fleet.
pub fn is_hit(coord: Coord, fleet: &Fleet) -> bool {
    fleet.cells().any(|c| c == coord)
}

/// True iff the positions, sorted by (row, col), form a single straight
/// unit-step run. Zero or one cell is trivially continuous.
pub fn is_continuous(positions: &[Coord]) -> bool {
    if positions.len() < 2 {
        return true;
    }
    let mut sorted = positions.to_vec();
    sorted.sort();

    let horizontal = sorted[0].row == sorted[1].row;
    let vertical = sorted[0].col == sorted[1].col;
    if !horizontal && !vertical {
        return false;
    }
    sorted.windows(2).all(|pair| {
        if horizontal {
            pair[1].row == sorted[0].row && pair[1].col as usize == pair[0].col as usize + 1
        } else {
            pair[1].col == sorted[0].col && pair[1].row as usize == pair[0].row as usize + 1
        }
    })
}

/// True iff the player has placed exactly one ship of each required type
/// with its exact length, and each ship passes `is_continuous`.
pub fn fleet_complete(fleet: &Fleet) -> bool {
    FLEET_TYPES.iter().all(|&ship| match fleet.get(ship) {
        Some(positions) => positions.len() == ship.length() && is_continuous(positions),
        None => false,
    })
}
