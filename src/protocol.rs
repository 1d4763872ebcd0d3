//! Wire protocol: events exchanged between clients and the server, and
//! the declarative outbound routing table.

use serde::{Deserialize, Serialize};

use crate::common::{Coord, Slot};
use crate::game::StateView;
use crate::session::SessionId;
use crate::ship::ShipType;

/// Events sent by a client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    /// Place a ship of `ship_type` on the listed cells.
    PlaceShip {
        ship_type: ShipType,
        positions: Vec<Coord>,
    },
    /// Declare this player's fleet final.
    FinishPlacingShips,
    /// Begin active play once both fleets are final.
    StartGame,
    /// Fire at the opponent's board.
    Attack { row: u8, col: u8 },
    /// Tell this player's voice recognizer to start listening.
    ActivateVoiceCommand,
    /// Request a snapshot of the current match state.
    SyncState,
}

/// Events sent by the server to one or both clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerEvent {
    /// Slot assigned to the connecting client.
    PlayerNumber(Slot),
    /// Both slots occupied; the connection is closed after this.
    GameFull,
    ShipAlreadyPlaced(ShipType),
    InvalidPlacement(ShipType),
    ShipPlaced {
        ship_type: ShipType,
        positions: Vec<Coord>,
    },
    /// The fifth ship was placed; the player may finish placement.
    ReadyToFinish,
    IncompletePlacement,
    /// Both players finished placing.
    ReadyToStart,
    /// Player 1 is done; player 2 is still placing.
    Player2TurnToPlace,
    /// Active play begins; payload is the first turn holder.
    GameStarted(Slot),
    YourTurn,
    /// The turn passed to the given slot.
    TurnUpdate(Slot),
    NotYourTurn,
    AlreadyAttacked,
    AttackResult {
        row: u8,
        col: u8,
        hit: bool,
        attacker: Slot,
    },
    GameOver {
        winner: Slot,
    },
    GameReset,
    CannotStartGame,
    /// Snapshot answering a `SyncState` request.
    GameState(StateView),
    /// A recognized line from this player's voice recognizer, verbatim.
    VoiceCommand(String),
    /// Generic guard rejection.
    Error {
        message: String,
    },
}

/// Delivery scope of an outbound event, before resolution against the
/// acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The session the event answers.
    Origin,
    /// The opponent of the originating player.
    Opponent,
    /// The player currently holding the turn.
    CurrentTurn,
    /// Both connected players.
    Broadcast,
}

/// Declarative outbound routing: every server event has exactly one
/// delivery scope, decided here rather than in the handlers.
pub fn route(event: &ServerEvent) -> Route {
    use ServerEvent::*;
    match event {
        PlayerNumber(_) | GameFull | ShipAlreadyPlaced(_) | InvalidPlacement(_)
        | ShipPlaced { .. } | ReadyToFinish | IncompletePlacement | NotYourTurn
        | AlreadyAttacked | CannotStartGame | GameState(_) | VoiceCommand(_) | Error { .. } => {
            Route::Origin
        }
        Player2TurnToPlace => Route::Opponent,
        YourTurn => Route::CurrentTurn,
        ReadyToStart | GameStarted(_) | TurnUpdate(_) | AttackResult { .. } | GameOver { .. }
        | GameReset => Route::Broadcast,
    }
}

/// Concrete delivery target after route resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Session(SessionId),
    Slot(Slot),
    All,
}

/// A routed outbound event produced by the gateway and delivered by the
/// dispatch loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    /// Route `event` according to the delivery table, resolving targeted
    /// scopes against the originating session and player and the current
    /// turn holder.
    pub fn routed(event: ServerEvent, origin: SessionId, slot: Slot, turn: Slot) -> Outbound {
        let recipient = match route(&event) {
            Route::Origin => Recipient::Session(origin),
            Route::Opponent => Recipient::Slot(slot.opponent()),
            Route::CurrentTurn => Recipient::Slot(turn),
            Route::Broadcast => Recipient::All,
        };
        Outbound { recipient, event }
    }

    /// Targeted event for a session that may not hold a slot yet.
    pub fn session(origin: SessionId, event: ServerEvent) -> Outbound {
        Outbound {
            recipient: Recipient::Session(origin),
            event,
        }
    }

    pub fn broadcast(event: ServerEvent) -> Outbound {
        Outbound {
            recipient: Recipient::All,
            event,
        }
    }
}
