//! Event gateway: resolves sessions, drives the match state through the
//! phase machine and emits routed outbound events.
//!
//! Every inbound event maps to exactly one core operation. Guard
//! rejections become targeted notifications; nothing here panics across
//! the dispatch boundary or leaves the match state partially updated.

use log::{debug, info};

use crate::common::{Coord, GameError, Slot};
use crate::game::{AttackOutcome, MatchState, PlacementProgress};
use crate::protocol::{ClientEvent, Outbound, ServerEvent};
use crate::session::{SessionDirectory, SessionId};
use crate::ship::ShipType;
use crate::voice::VoiceManager;

/// Composes the match state, session directory and voice manager behind
/// one dispatch surface. Exclusively owns all match mutation.
pub struct Gateway {
    state: MatchState,
    directory: SessionDirectory,
    voice: VoiceManager,
}

impl Gateway {
    pub fn new(state: MatchState, directory: SessionDirectory, voice: VoiceManager) -> Self {
        Self {
            state,
            directory,
            voice,
        }
    }

    /// Read-only view of the match, for tests and diagnostics.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Session currently bound to `slot`, if any.
    pub fn session_for(&self, slot: Slot) -> Option<SessionId> {
        self.directory.reverse_resolve(slot)
    }

    /// A new connection arrived. Assigns a slot and starts that player's
    /// voice recognizer, or rejects the connection when the match is
    /// full. The caller closes the connection after a `GameFull`.
    pub fn connect(&mut self, session: SessionId) -> Vec<Outbound> {
        match self.directory.assign(session) {
            Ok(slot) => {
                info!("session {} assigned player slot {}", session, slot);
                self.voice.spawn(slot);
                if self.directory.is_full() {
                    self.state.begin_placement();
                }
                vec![Outbound::session(session, ServerEvent::PlayerNumber(slot))]
            }
            Err(_) => {
                info!("session {} rejected: match is full", session);
                vec![Outbound::session(session, ServerEvent::GameFull)]
            }
        }
    }

    /// A connection went away. Releasing an assigned slot terminates the
    /// player's voice recognizer and unconditionally resets the match;
    /// unassigned sessions are a no-op.
    pub fn disconnect(&mut self, session: SessionId) -> Vec<Outbound> {
        match self.directory.release(session) {
            Some(slot) => {
                info!("player {} disconnected, resetting match", slot);
                self.voice.terminate(slot);
                self.state.reset();
                vec![Outbound::broadcast(ServerEvent::GameReset)]
            }
            None => Vec::new(),
        }
    }

    /// Dispatch one inbound client event. Events from sessions that hold
    /// no slot are dropped.
    pub fn handle(&mut self, session: SessionId, event: ClientEvent) -> Vec<Outbound> {
        let Some(slot) = self.directory.resolve(session) else {
            debug!("dropping event from unknown session {}", session);
            return Vec::new();
        };
        match event {
            ClientEvent::PlaceShip {
                ship_type,
                positions,
            } => self.place_ship(session, slot, ship_type, positions),
            ClientEvent::FinishPlacingShips => self.finish_placing(session, slot),
            ClientEvent::StartGame => self.start_game(session, slot),
            ClientEvent::Attack { row, col } => {
                self.attack(session, slot, Coord::new(row, col))
            }
            ClientEvent::ActivateVoiceCommand => {
                self.voice.activate(slot);
                Vec::new()
            }
            ClientEvent::SyncState => {
                let view = self.state.view(slot);
                vec![self.routed(session, slot, ServerEvent::GameState(view))]
            }
        }
    }

    /// Relay one recognized voice line to the player it belongs to.
    /// Dropped if that slot has no live session anymore.
    pub fn voice_line(&mut self, slot: Slot, line: String) -> Vec<Outbound> {
        match self.directory.reverse_resolve(slot) {
            Some(session) => {
                debug!("relaying voice command to player {}", slot);
                vec![Outbound::session(session, ServerEvent::VoiceCommand(line))]
            }
            None => Vec::new(),
        }
    }

    /// Terminate every voice recognizer; called on server shutdown.
    pub fn shutdown(&mut self) {
        self.voice.shutdown();
    }

    fn place_ship(
        &mut self,
        session: SessionId,
        slot: Slot,
        ship_type: ShipType,
        positions: Vec<Coord>,
    ) -> Vec<Outbound> {
        match self.state.place_ship(slot, ship_type, positions.clone()) {
            Ok(fleet_full) => {
                info!("player {} placed {}", slot, ship_type);
                let mut out = vec![self.routed(
                    session,
                    slot,
                    ServerEvent::ShipPlaced {
                        ship_type,
                        positions,
                    },
                )];
                if fleet_full {
                    out.push(self.routed(session, slot, ServerEvent::ReadyToFinish));
                }
                out
            }
            Err(err) => vec![self.rejected(session, slot, err)],
        }
    }

    fn finish_placing(&mut self, session: SessionId, slot: Slot) -> Vec<Outbound> {
        match self.state.finish_placement(slot) {
            Ok(PlacementProgress::BothDone) => {
                info!("both players finished placing");
                vec![self.routed(session, slot, ServerEvent::ReadyToStart)]
            }
            Ok(PlacementProgress::OpponentPlacing) => {
                info!("player {} finished placing", slot);
                if slot == Slot::One {
                    vec![self.routed(session, slot, ServerEvent::Player2TurnToPlace)]
                } else {
                    Vec::new()
                }
            }
            Err(err) => vec![self.rejected(session, slot, err)],
        }
    }

    fn start_game(&mut self, session: SessionId, slot: Slot) -> Vec<Outbound> {
        match self.state.start() {
            Ok(first) => {
                info!("game started, player {} to move", first);
                vec![
                    self.routed(session, slot, ServerEvent::GameStarted(first)),
                    self.routed(session, slot, ServerEvent::YourTurn),
                ]
            }
            Err(err) => vec![self.rejected(session, slot, err)],
        }
    }

    fn attack(&mut self, session: SessionId, slot: Slot, coord: Coord) -> Vec<Outbound> {
        match self.state.attack(slot, coord) {
            Ok(AttackOutcome::Continue { hit, next_turn }) => {
                debug!("player {} attacked {}: hit={}", slot, coord, hit);
                vec![
                    self.routed(
                        session,
                        slot,
                        ServerEvent::AttackResult {
                            row: coord.row,
                            col: coord.col,
                            hit,
                            attacker: slot,
                        },
                    ),
                    self.routed(session, slot, ServerEvent::TurnUpdate(next_turn)),
                    self.routed(session, slot, ServerEvent::YourTurn),
                ]
            }
            Ok(AttackOutcome::Win { hit, winner }) => {
                info!("player {} wins", winner);
                self.state.reset();
                // both players are still connected; a fresh round may begin
                if self.directory.is_full() {
                    self.state.begin_placement();
                }
                vec![
                    Outbound::broadcast(ServerEvent::AttackResult {
                        row: coord.row,
                        col: coord.col,
                        hit,
                        attacker: slot,
                    }),
                    Outbound::broadcast(ServerEvent::GameOver { winner }),
                    Outbound::broadcast(ServerEvent::GameReset),
                ]
            }
            Err(err) => vec![self.rejected(session, slot, err)],
        }
    }

    /// Resolve `event`'s declared route against the acting player.
    fn routed(&self, session: SessionId, slot: Slot, event: ServerEvent) -> Outbound {
        Outbound::routed(event, session, slot, self.state.turn())
    }

    fn rejected(&self, session: SessionId, slot: Slot, err: GameError) -> Outbound {
        debug!("player {} rejected: {}", slot, err);
        self.routed(session, slot, rejection_event(err))
    }
}

/// Map a guard rejection to its specific notification, falling back to a
/// generic error message.
fn rejection_event(err: GameError) -> ServerEvent {
    match err {
        GameError::ShipAlreadyPlaced(ship) => ServerEvent::ShipAlreadyPlaced(ship),
        GameError::InvalidPlacement(ship) => ServerEvent::InvalidPlacement(ship),
        GameError::IncompleteFleet => ServerEvent::IncompletePlacement,
        GameError::CannotStart => ServerEvent::CannotStartGame,
        GameError::NotYourTurn => ServerEvent::NotYourTurn,
        GameError::AlreadyAttacked => ServerEvent::AlreadyAttacked,
        other => ServerEvent::Error {
            message: other.to_string(),
        },
    }
}
