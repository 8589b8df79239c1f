use core::time::Duration;

use crate::unit::{Ability, UnitSpec};

pub const BOARD_SIZE: usize = 10;
pub const NUM_UNITS: usize = 6;

/// Number of rockets an MMRL barrage fires.
pub const BARRAGE_ROCKETS: usize = 5;

pub const AREA_PACING: Duration = Duration::from_millis(150);
pub const BARRAGE_PACING: Duration = Duration::from_millis(500);

/// Every duelist places these units, in this order.
pub const FLEET: [UnitSpec; NUM_UNITS] = [
    UnitSpec::new("Airport", 2, 4, Some(Ability::Area { max_targets: 7 })),
    UnitSpec::new("Radar Tower", 2, 3, None),
    UnitSpec::new("HQ", 1, 2, None),
    UnitSpec::new("Railway Gun", 1, 6, Some(Ability::HeavyLine { max_targets: 8 })),
    UnitSpec::new("MMRL", 2, 2, Some(Ability::Barrage { rockets: BARRAGE_ROCKETS })),
    UnitSpec::new("Tank", 1, 2, None),
];

/// Total number of cells covered by a full fleet.
pub const TOTAL_FLEET_CELLS: usize = fleet_cells();

const fn fleet_cells() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < NUM_UNITS {
        total += FLEET[i].length();
        i += 1;
    }
    total
}

/// Delays inserted between successive targets of a multi-target shot.
///
/// Purely presentational: a zero delay degrades to a cooperative yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub area: Duration,
    pub barrage: Duration,
}

impl Pacing {
    pub const fn none() -> Self {
        Self {
            area: Duration::ZERO,
            barrage: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            area: AREA_PACING,
            barrage: BARRAGE_PACING,
        }
    }
}

/// Runtime knobs for a single match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchConfig {
    pub pacing: Pacing,
    /// Fix the RNG seed for reproducible matches.
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pacing: Pacing::none(),
            seed: Some(seed),
        }
    }
}

/// Look up a catalog entry by name.
pub fn unit_spec(name: &str) -> Option<&'static UnitSpec> {
    FLEET.iter().find(|spec| spec.name() == name)
}
