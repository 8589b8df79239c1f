//! One side of a match: its units, its own grid and its view of the
//! opponent.

use rand::Rng;

use crate::common::{GridError, HitOutcome, PlacementError, Side};
use crate::config::FLEET;
use crate::coord::Coord;
use crate::grid::{OpponentView, OwnGrid, UnitId};
use crate::shot::ShotKind;
use crate::unit::{random_footprint, Unit};

#[derive(Debug, Clone)]
pub struct Duelist {
    side: Side,
    name: String,
    grid: OwnGrid,
    view: OpponentView,
    units: Vec<Unit>,
    ready: bool,
}

impl Duelist {
    /// A duelist with the full, unplaced catalog fleet.
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
            grid: OwnGrid::new(),
            view: OpponentView::new(),
            units: FLEET.iter().copied().map(Unit::new).collect(),
            ready: false,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &OwnGrid {
        &self.grid
    }

    pub fn view(&self) -> &OpponentView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut OpponentView {
        &mut self.view
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit, GridError> {
        self.units.get(id).ok_or(GridError::UnknownUnit(id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit, GridError> {
        self.units.get_mut(id).ok_or(GridError::UnknownUnit(id))
    }

    /// Place unit `id` on `cells`. The cell count must match the unit's
    /// footprint and the grid must accept every cell.
    pub fn place_unit(&mut self, id: UnitId, cells: Vec<Coord>) -> Result<(), PlacementError> {
        let unit = self.units.get(id).ok_or(PlacementError::InvalidUnit(id))?;
        if unit.is_placed() {
            return Err(PlacementError::AlreadyPlaced(unit.name()));
        }
        let expected = unit.spec().length();
        if cells.len() != expected {
            return Err(PlacementError::FootprintLength {
                unit: unit.name(),
                expected,
                got: cells.len(),
            });
        }
        self.grid.place(id, &cells)?;
        self.units[id].occupy(cells);
        Ok(())
    }

    /// First unit, in catalog order, that still needs a position.
    pub fn next_unplaced(&self) -> Option<UnitId> {
        self.units.iter().position(|u| !u.is_placed())
    }

    pub fn is_fully_placed(&self) -> bool {
        self.next_unplaced().is_none()
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// `true` once no unit has an intact cell left.
    pub fn all_destroyed(&self) -> bool {
        self.units.iter().all(|u| !u.is_alive())
    }

    /// The unit granting `kind`, if the fleet has one.
    pub fn unit_for(&self, kind: ShotKind) -> Option<UnitId> {
        self.units
            .iter()
            .position(|u| u.spec().ability().map(|a| a.kind()) == Some(kind))
    }

    /// Apply an incoming shot to the own grid.
    ///
    /// Returns `None` for an empty cell, otherwise the unit hit and the
    /// effect on it.
    pub fn receive_hit(&mut self, coord: Coord) -> Result<Option<(UnitId, HitOutcome)>, GridError> {
        let Some(id) = self.grid.occupant_at(coord) else {
            return Ok(None);
        };
        let outcome = self.unit_mut(id)?.apply_hit(coord)?;
        Ok(Some((id, outcome)))
    }

    /// A random footprint for unit `id` that fits the board and overlaps
    /// nothing already placed.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        id: UnitId,
    ) -> Result<Vec<Coord>, PlacementError> {
        let spec = self.unit(id).map_err(|_| PlacementError::InvalidUnit(id))?.spec();
        random_footprint(rng, spec.shape(), self.grid.occupied())
            .ok_or(PlacementError::NoRoom(spec.name()))
    }

    /// Place every remaining unit at random.
    pub fn place_randomly<R: Rng>(&mut self, rng: &mut R) -> Result<(), PlacementError> {
        while let Some(id) = self.next_unplaced() {
            let cells = self.random_placement(rng, id)?;
            self.place_unit(id, cells)?;
        }
        Ok(())
    }
}
