//! Messages exchanged between the duel server and its clients.

use serde::{Deserialize, Serialize};

use crate::common::{ShotOutcome, Side};
use crate::coord::Coord;
use crate::grid::ViewSnapshot;
use crate::shot::ShotKind;

pub const PROTOCOL_VERSION: u8 = 1;

/// Ask the client where to put one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub unit: String,
    /// `(rows, cols)` of the unit's rectangle.
    pub shape: (usize, usize),
    /// Number of cells the reply must contain.
    pub length: usize,
    /// Cells already taken by previously placed units.
    pub occupied: Vec<Coord>,
    /// Why the previous answer was rejected.
    pub notice: Option<String>,
}

/// Ask the client which shot to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRequest {
    pub available: Vec<ShotKind>,
    pub notice: Option<String>,
}

/// Ask the client for the targets of a shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequest {
    pub kind: ShotKind,
    pub min: usize,
    pub max: usize,
    /// What the shooter already knows about the opponent's grid.
    pub view: ViewSnapshot,
    pub notice: Option<String>,
}

/// How the match ended, from the recipient's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
    /// The opponent's connection dropped.
    Aborted,
}

/// Things that happened in the match, for the client to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Sent to the owner only.
    UnitPlaced { unit: String, cells: Vec<Coord> },
    /// Both sides have placed their units; `side` is the recipient's seat.
    BattleStarted { side: Side, opening: Side },
    ShotFired { shooter: Side, kind: ShotKind },
    ShotResolved {
        shooter: Side,
        coord: Coord,
        outcome: ShotOutcome,
    },
    /// A salvo target that had already been resolved and was skipped.
    TargetRejected { shooter: Side, coord: Coord },
    TurnChanged { active: Side },
    MatchFinished {
        winner: Option<Side>,
        verdict: Verdict,
    },
}

/// Wire message. Prompts flow server to client, replies client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// First message of a client.
    Hello { version: u8, name: String },
    /// Server answer to `Hello`, carrying the client's seat.
    Welcome { version: u8, side: Side },
    PlaceUnit(PlacementRequest),
    Placement { cells: Vec<Coord> },
    ChooseShot(ShotRequest),
    ShotChoice { token: String },
    ChooseTargets(TargetRequest),
    Targets { cells: Vec<Coord> },
    Event(Event),
}
