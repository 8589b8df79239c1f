//! Common types for the duel: sides, cell marks, shot outcomes and errors.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Coord;
use crate::shot::ShotKind;

/// One of the two seats of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// What a duelist knows about one cell of the opponent's grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Unknown,
    Miss,
    Hit,
    Destroyed,
}

/// Result of hitting one cell of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// At least one cell is still intact.
    StillAlive,
    /// This hit took out the last intact cell.
    JustDestroyed,
    /// The unit was already destroyed before this hit.
    AlreadyDestroyed,
}

/// Result of resolving a single target coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Miss,
    Hit,
    /// The hit destroyed a unit; its whole footprint is revealed.
    Destroyed { unit: String, cells: Vec<Coord> },
}

impl ShotOutcome {
    pub fn mark(&self) -> Mark {
        match self {
            ShotOutcome::Miss => Mark::Miss,
            ShotOutcome::Hit => Mark::Hit,
            ShotOutcome::Destroyed { .. } => Mark::Destroyed,
        }
    }
}

/// Rejected unit placements. Always recoverable by asking again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{0} is outside the board")]
    OutOfBounds(Coord),
    #[error("{0} is already occupied")]
    Overlap(Coord),
    #[error("{0} has already been placed")]
    AlreadyPlaced(&'static str),
    #[error("{unit} needs exactly {expected} cells, got {got}")]
    FootprintLength {
        unit: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("no unit with index {0}")]
    InvalidUnit(usize),
    #[error("no free space left for {0}")]
    NoRoom(&'static str),
}

/// Rejected shot requests. Recoverable, except that a rejected target in
/// the middle of a salvo is skipped rather than re-asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShotError {
    #[error("the {0} shot is not available")]
    Unavailable(ShotKind),
    #[error("'{0}' is not a shot type")]
    InvalidType(String),
    #[error("{0} has already been resolved")]
    AlreadyResolvedTarget(Coord),
    #[error("{0} is outside the board")]
    OutOfBounds(Coord),
    #[error("the {kind} shot takes {min} to {max} targets, got {got}")]
    TargetCount {
        kind: ShotKind,
        min: usize,
        max: usize,
        got: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Inconsistencies inside a grid or unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("{0} is not part of this unit")]
    NotOnUnit(Coord),
    #[error("no unit with index {0}")]
    UnknownUnit(usize),
}

/// Misuse of the turn arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("side {0} does not hold the turn")]
    NotActive(Side),
    #[error("the match is already finished")]
    Finished,
}
