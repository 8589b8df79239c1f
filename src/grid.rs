//! Per-duelist grids: unit occupancy of the own board, and the record of
//! what has been learned about the opponent's board.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::bitboard::CellMask;
use crate::common::{Mark, PlacementError, ShotError};
use crate::config::BOARD_SIZE;
use crate::coord::Coord;

/// Index of a unit within its duelist's fleet.
pub type UnitId = usize;

/// The duelist's own board: which unit, if any, sits on each cell.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnGrid {
    occupied: CellMask,
    owners: [Option<UnitId>; BOARD_SIZE * BOARD_SIZE],
}

impl OwnGrid {
    pub fn new() -> Self {
        Self {
            occupied: CellMask::new(),
            owners: [None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// Record `unit` on `cells`.
    ///
    /// All cells are validated before anything is written, so a rejected
    /// placement leaves the grid untouched.
    pub fn place(&mut self, unit: UnitId, cells: &[Coord]) -> Result<(), PlacementError> {
        let mut claimed = CellMask::new();
        for &cell in cells {
            if !cell.in_bounds() {
                return Err(PlacementError::OutOfBounds(cell));
            }
            if self.occupied.contains(cell) || claimed.contains(cell) {
                return Err(PlacementError::Overlap(cell));
            }
            claimed.insert(cell);
        }
        for &cell in cells {
            self.owners[cell.index()] = Some(unit);
        }
        self.occupied |= claimed;
        Ok(())
    }

    /// The unit on `coord`, if any.
    pub fn occupant_at(&self, coord: Coord) -> Option<UnitId> {
        if !coord.in_bounds() {
            return None;
        }
        self.owners[coord.index()]
    }

    /// Occupancy mask of all placed units.
    pub fn occupied(&self) -> CellMask {
        self.occupied
    }
}

impl Default for OwnGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OwnGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnGrid")
            .field("occupied", &self.occupied)
            .finish()
    }
}

/// Shot results against the opponent, one mask per mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpponentView {
    misses: CellMask,
    hits: CellMask,
    destroyed: CellMask,
}

impl OpponentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: Coord) -> Mark {
        if self.destroyed.contains(coord) {
            Mark::Destroyed
        } else if self.hits.contains(coord) {
            Mark::Hit
        } else if self.misses.contains(coord) {
            Mark::Miss
        } else {
            Mark::Unknown
        }
    }

    pub fn is_resolved(&self, coord: Coord) -> bool {
        self.resolved().contains(coord)
    }

    /// Record the result of a shot at `coord`. Each cell is written once.
    pub fn mark(&mut self, coord: Coord, mark: Mark) -> Result<(), ShotError> {
        if !coord.in_bounds() {
            return Err(ShotError::OutOfBounds(coord));
        }
        if self.is_resolved(coord) {
            return Err(ShotError::AlreadyResolvedTarget(coord));
        }
        match mark {
            Mark::Unknown => {}
            Mark::Miss => {
                self.misses.insert(coord);
            }
            Mark::Hit => {
                self.hits.insert(coord);
            }
            Mark::Destroyed => {
                self.destroyed.insert(coord);
            }
        }
        Ok(())
    }

    /// Show the full footprint of a destroyed unit.
    pub fn reveal_destroyed(&mut self, cells: &[Coord]) {
        let revealed: CellMask = cells.iter().copied().collect();
        self.destroyed |= revealed;
        self.hits = self.hits & !revealed;
    }

    /// Every cell that is no longer `Unknown`.
    pub fn resolved(&self) -> CellMask {
        self.misses | self.hits | self.destroyed
    }

    pub fn misses(&self) -> CellMask {
        self.misses
    }

    /// Hits on units that are still alive.
    pub fn hits(&self) -> CellMask {
        self.hits
    }

    pub fn destroyed(&self) -> CellMask {
        self.destroyed
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            misses: self.misses.iter().collect(),
            hits: self.hits.iter().collect(),
            destroyed: self.destroyed.iter().collect(),
        }
    }
}

/// Wire form of an [`OpponentView`], sent along with targeting prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub misses: Vec<Coord>,
    pub hits: Vec<Coord>,
    pub destroyed: Vec<Coord>,
}

impl ViewSnapshot {
    pub fn is_resolved(&self, coord: Coord) -> bool {
        self.misses.contains(&coord) || self.hits.contains(&coord) || self.destroyed.contains(&coord)
    }
}
