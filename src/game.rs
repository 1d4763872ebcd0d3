//! Authoritative match state: fleets, hit records and the phase machine.

use serde::{Deserialize, Serialize};

use crate::board::{self, Fleet};
use crate::common::{Coord, GameError, Slot};
use crate::config::NUM_SHIPS;
use crate::phase::{Phase, PhaseMachine};
use crate::ship::ShipType;

/// One recorded attack against a defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEntry {
    pub coord: Coord,
    pub hit: bool,
}

/// Outcome of a legal attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Play continues; the turn passes to `next_turn`.
    Continue { hit: bool, next_turn: Slot },
    /// The defender's fleet is destroyed.
    Win { hit: bool, winner: Slot },
}

/// What finishing placement unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementProgress {
    /// Both players are done; the game may be started.
    BothDone,
    /// The opponent is still placing ships.
    OpponentPlacing,
}

/// One player's view of the match, for late-querying or reconnecting
/// clients. Never exposes the opponent's ship positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateView {
    pub current_turn: Slot,
    pub started: bool,
    /// True while this player may still place ships.
    pub placing: bool,
    pub my_ships: Vec<(ShipType, Vec<Coord>)>,
    /// Attacks this player has made against the opponent.
    pub my_hits: Vec<HitEntry>,
    /// Attacks the opponent has made against this player.
    pub enemy_hits: Vec<HitEntry>,
}

/// The single authoritative record of one match. Constructed once at
/// startup and threaded explicitly through the event gateway; all
/// mutation goes through the operations below, each of which consults the
/// phase machine first and leaves state untouched on rejection.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    fleets: [Fleet; 2],
    hit_records: [Vec<HitEntry>; 2],
    phase: PhaseMachine,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Slot currently authorized to attack.
    pub fn turn(&self) -> Slot {
        self.phase.turn()
    }

    pub fn placement_done(&self, slot: Slot) -> bool {
        self.phase.placement_done(slot)
    }

    pub fn fleet(&self, slot: Slot) -> &Fleet {
        &self.fleets[slot.index()]
    }

    /// Attacks recorded against `slot`, in arrival order.
    pub fn hit_record(&self, slot: Slot) -> &[HitEntry] {
        &self.hit_records[slot.index()]
    }

    /// Both players are connected; placement opens.
    pub fn begin_placement(&mut self) {
        self.phase.begin_placement();
    }

    /// Record a ship for `slot`. Returns true when this was the fifth
    /// ship, i.e. the player may now finish placement.
    pub fn place_ship(
        &mut self,
        slot: Slot,
        ship: ShipType,
        positions: Vec<Coord>,
    ) -> Result<bool, GameError> {
        self.phase.ensure_placing(slot)?;
        let fleet = &mut self.fleets[slot.index()];
        if fleet.contains(ship) {
            return Err(GameError::ShipAlreadyPlaced(ship));
        }
        if !board::validate_placement(&positions, fleet) {
            return Err(GameError::InvalidPlacement(ship));
        }
        fleet.insert(ship, positions);
        Ok(fleet.placed_count() == NUM_SHIPS)
    }

    /// Flip `slot`'s placement sub-state to done. Rejected unless the
    /// fleet is complete: all five ships, exact lengths, each a straight
    /// contiguous run.
    pub fn finish_placement(&mut self, slot: Slot) -> Result<PlacementProgress, GameError> {
        self.phase.ensure_placing(slot)?;
        if !board::fleet_complete(self.fleet(slot)) {
            return Err(GameError::IncompleteFleet);
        }
        self.phase.mark_placement_done(slot);
        Ok(if self.phase.both_done() {
            PlacementProgress::BothDone
        } else {
            PlacementProgress::OpponentPlacing
        })
    }

    /// Begin active play. Returns the first turn holder (player 1).
    pub fn start(&mut self) -> Result<Slot, GameError> {
        self.phase.start()
    }

    /// Resolve an attack by `attacker` on the opponent's board. A legal
    /// attack appends to the opponent's hit record and either passes the
    /// turn or concludes the match when every fleet cell has been hit.
    pub fn attack(&mut self, attacker: Slot, coord: Coord) -> Result<AttackOutcome, GameError> {
        self.phase.ensure_turn(attacker)?;
        let defender = attacker.opponent();
        if self.hit_records[defender.index()]
            .iter()
            .any(|entry| entry.coord == coord)
        {
            return Err(GameError::AlreadyAttacked);
        }

        let hit = board::is_hit(coord, self.fleet(defender));
        self.hit_records[defender.index()].push(HitEntry { coord, hit });

        let hits_taken = self.hit_records[defender.index()]
            .iter()
            .filter(|entry| entry.hit)
            .count();
        if hits_taken == self.fleet(defender).total_cells() {
            self.phase.conclude();
            Ok(AttackOutcome::Win {
                hit,
                winner: attacker,
            })
        } else {
            self.phase.advance_turn();
            Ok(AttackOutcome::Continue {
                hit,
                next_turn: self.phase.turn(),
            })
        }
    }

    /// Clear all per-player data and flags back to initial values.
    pub fn reset(&mut self) {
        for fleet in &mut self.fleets {
            fleet.clear();
        }
        for record in &mut self.hit_records {
            record.clear();
        }
        self.phase.reset();
    }

    /// Read-only snapshot of `slot`'s view of the match.
    pub fn view(&self, slot: Slot) -> StateView {
        let opponent = slot.opponent();
        StateView {
            current_turn: self.phase.turn(),
            started: self.phase.phase() == Phase::Active,
            placing: !self.phase.placement_done(slot),
            my_ships: self
                .fleet(slot)
                .ships()
                .map(|(ship, positions)| (ship, positions.to_vec()))
                .collect(),
            my_hits: self.hit_records[opponent.index()].clone(),
            enemy_hits: self.hit_records[slot.index()].clone(),
        }
    }
}
