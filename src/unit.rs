//! Unit catalog entries and placed combat units.

use core::fmt;

use rand::Rng;

use crate::bitboard::CellMask;
use crate::config::BOARD_SIZE;
use crate::common::{GridError, HitOutcome, PlacementError};
use crate::coord::Coord;
use crate::shot::ShotKind;

/// Orientation of a unit's rectangle on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `rows × cols` as listed in the catalog.
    Horizontal,
    /// Rotated a quarter turn: `cols × rows`.
    Vertical,
}

/// Special shot granted by a unit while it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Area { max_targets: usize },
    HeavyLine { max_targets: usize },
    Barrage { rockets: usize },
}

impl Ability {
    pub fn kind(&self) -> ShotKind {
        match self {
            Ability::Area { .. } => ShotKind::Area,
            Ability::HeavyLine { .. } => ShotKind::HeavyLine,
            Ability::Barrage { .. } => ShotKind::Barrage,
        }
    }
}

/// Catalog entry: name, rectangle shape and optional ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    name: &'static str,
    rows: u8,
    cols: u8,
    ability: Option<Ability>,
}

impl UnitSpec {
    pub const fn new(name: &'static str, rows: u8, cols: u8, ability: Option<Ability>) -> Self {
        Self {
            name,
            rows,
            cols,
            ability,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `(rows, cols)` in horizontal orientation.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows as usize, self.cols as usize)
    }

    /// Number of cells the unit covers.
    pub const fn length(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn ability(&self) -> Option<Ability> {
        self.ability
    }

    /// The rectangle anchored at `origin` (top-left) in `orientation`.
    pub fn footprint(
        &self,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<Vec<Coord>, PlacementError> {
        let (h, w) = match orientation {
            Orientation::Horizontal => self.shape(),
            Orientation::Vertical => (self.cols as usize, self.rows as usize),
        };
        let mut cells = Vec::with_capacity(self.length());
        for dr in 0..h {
            for dc in 0..w {
                let (r, c) = (origin.row() + dr, origin.col() + dc);
                let cell = Coord::new(r, c).map_err(|_| {
                    PlacementError::OutOfBounds(Coord::unchecked(r as u8, c as u8))
                })?;
                cells.push(cell);
            }
        }
        Ok(cells)
    }
}

/// Attempts made by [`random_footprint`] before giving up.
const PLACEMENT_ATTEMPTS: usize = 200;

/// A random rectangle of `shape` (either orientation) that fits the board
/// and avoids `occupied`.
pub fn random_footprint<R: Rng>(
    rng: &mut R,
    shape: (usize, usize),
    occupied: CellMask,
) -> Option<Vec<Coord>> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let (h, w) = if rng.random() {
            shape
        } else {
            (shape.1, shape.0)
        };
        if h == 0 || w == 0 || h > BOARD_SIZE || w > BOARD_SIZE {
            return None;
        }
        let r = rng.random_range(0..=BOARD_SIZE - h);
        let c = rng.random_range(0..=BOARD_SIZE - w);
        let cells: Vec<Coord> = (0..h)
            .flat_map(|dr| (0..w).map(move |dc| Coord::unchecked((r + dr) as u8, (c + dc) as u8)))
            .collect();
        if cells.iter().all(|&cell| !occupied.contains(cell)) {
            return Some(cells);
        }
    }
    None
}

/// A unit owned by one duelist.
///
/// Cells are assigned once by [`Unit::occupy`]; damage is tracked as a hit
/// mask over those cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Unit {
    spec: UnitSpec,
    cells: Vec<Coord>,
    mask: CellMask,
    hits: CellMask,
    ability_available: bool,
}

impl Unit {
    /// A fresh, unplaced unit.
    pub fn new(spec: UnitSpec) -> Self {
        Self {
            spec,
            cells: Vec::new(),
            mask: CellMask::new(),
            hits: CellMask::new(),
            ability_available: spec.ability.is_some(),
        }
    }

    pub fn spec(&self) -> &UnitSpec {
        &self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Footprint in placement order. Empty until placed.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn mask(&self) -> CellMask {
        self.mask
    }

    pub fn is_placed(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Assign the footprint. The grid has already validated the cells.
    pub(crate) fn occupy(&mut self, cells: Vec<Coord>) {
        self.mask = cells.iter().copied().collect();
        self.cells = cells;
    }

    /// `true` while at least one cell is intact.
    pub fn is_alive(&self) -> bool {
        self.hits.count() < self.mask.count()
    }

    pub fn is_hit(&self, coord: Coord) -> bool {
        self.hits.contains(coord)
    }

    pub fn intact_cells(&self) -> usize {
        self.mask.count() - self.hits.count()
    }

    /// Mark `coord` as hit.
    ///
    /// `JustDestroyed` is only ever returned by the hit that removes the last
    /// intact cell; later hits report `AlreadyDestroyed`.
    pub fn apply_hit(&mut self, coord: Coord) -> Result<HitOutcome, GridError> {
        if !self.mask.contains(coord) {
            return Err(GridError::NotOnUnit(coord));
        }
        if !self.is_alive() {
            return Ok(HitOutcome::AlreadyDestroyed);
        }
        self.hits.insert(coord);
        if self.is_alive() {
            Ok(HitOutcome::StillAlive)
        } else {
            Ok(HitOutcome::JustDestroyed)
        }
    }

    pub fn ability_available(&self) -> bool {
        self.ability_available
    }

    /// Flip the ability flag. Called once per use of the unit's shot.
    pub fn toggle_ability(&mut self) {
        self.ability_available = !self.ability_available;
    }

    /// The unit can fire its special shot right now.
    pub fn can_fire(&self) -> bool {
        self.spec.ability.is_some() && self.is_alive() && self.ability_available
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unit {{ name: \"{}\", cells: {:?}, hits: {}, ability_available: {} }}",
            self.spec.name,
            self.cells,
            self.hits.count(),
            self.ability_available,
        )
    }
}
