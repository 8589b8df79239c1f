//! Shot types and their resolution against the opponent's grid.
//!
//! [`ShotResolver::plan`] checks that a shot is allowed and expands it into a
//! [`Salvo`] of target coordinates. Sessions then [`resolve`] the targets one
//! at a time, publishing and pacing in between, and finish with [`complete`].

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{HitOutcome, ShotError, ShotOutcome};
use crate::config::Pacing;
use crate::coord::Coord;
use crate::duelist::Duelist;
use crate::grid::OpponentView;
use crate::unit::Ability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotKind {
    /// One supplied coordinate. Always available.
    Standard,
    /// Airport: several supplied coordinates, paced.
    Area,
    /// Railway gun: several supplied coordinates, fired at once.
    HeavyLine,
    /// MMRL: random coordinates over the whole board, paced.
    Barrage,
}

impl ShotKind {
    pub const ALL: [ShotKind; 4] = [
        ShotKind::Standard,
        ShotKind::Area,
        ShotKind::HeavyLine,
        ShotKind::Barrage,
    ];

    /// The letter a client types to select this shot.
    pub fn token(&self) -> char {
        match self {
            ShotKind::Standard => 'S',
            ShotKind::Area => 'A',
            ShotKind::HeavyLine => 'B',
            ShotKind::Barrage => 'R',
        }
    }

    /// Whether the client supplies the target coordinates.
    pub fn takes_targets(&self) -> bool {
        !matches!(self, ShotKind::Barrage)
    }
}

impl fmt::Display for ShotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShotKind::Standard => "standard",
            ShotKind::Area => "area",
            ShotKind::HeavyLine => "heavy-line",
            ShotKind::Barrage => "barrage",
        };
        write!(f, "{} ({})", name, self.token())
    }
}

impl FromStr for ShotKind {
    type Err = ShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        ShotKind::ALL
            .into_iter()
            .find(|kind| token.len() == 1 && token.eq_ignore_ascii_case(&kind.token().to_string()))
            .ok_or_else(|| ShotError::InvalidType(token.to_string()))
    }
}

/// The expanded form of one shot: targets in resolution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salvo {
    pub kind: ShotKind,
    pub targets: Vec<Coord>,
    /// Delay between two successive targets.
    pub pacing: Duration,
}

/// Validates, expands and applies shots.
pub struct ShotResolver<R> {
    pacing: Pacing,
    rng: R,
}

impl<R: Rng> ShotResolver<R> {
    pub fn new(pacing: Pacing, rng: R) -> Self {
        Self { pacing, rng }
    }

    /// Expand `kind` into a salvo, using `supplied` for client-targeted
    /// kinds and the resolver's RNG for the barrage.
    pub fn plan(
        &mut self,
        shooter: &Duelist,
        kind: ShotKind,
        supplied: Vec<Coord>,
    ) -> Result<Salvo, ShotError> {
        authorize(shooter, kind)?;
        match kind {
            ShotKind::Barrage => {
                let rockets = match shooter
                    .unit_for(kind)
                    .and_then(|id| shooter.unit(id).ok())
                    .and_then(|unit| unit.spec().ability())
                {
                    Some(Ability::Barrage { rockets }) => rockets,
                    _ => return Err(ShotError::Unavailable(kind)),
                };
                let targets = (0..rockets)
                    .map(|_| Coord::random(&mut self.rng))
                    .collect();
                Ok(Salvo {
                    kind,
                    targets,
                    pacing: self.pacing.barrage,
                })
            }
            _ => {
                let (min, max) = target_range(shooter, kind);
                if supplied.len() < min || supplied.len() > max {
                    return Err(ShotError::TargetCount {
                        kind,
                        min,
                        max,
                        got: supplied.len(),
                    });
                }
                if let Some(&bad) = supplied.iter().find(|c| !c.in_bounds()) {
                    return Err(ShotError::OutOfBounds(bad));
                }
                if kind == ShotKind::Standard {
                    let target = supplied[0];
                    if shooter.view().is_resolved(target) {
                        return Err(ShotError::AlreadyResolvedTarget(target));
                    }
                }
                let pacing = if kind == ShotKind::Area {
                    self.pacing.area
                } else {
                    Duration::ZERO
                };
                Ok(Salvo {
                    kind,
                    targets: supplied,
                    pacing,
                })
            }
        }
    }

    /// Plan, resolve and complete a shot in one go, without pacing.
    ///
    /// Each target yields its own result, so a rejected target does not stop
    /// the rest of the salvo.
    pub fn fire(
        &mut self,
        shooter: &mut Duelist,
        defender: &mut Duelist,
        kind: ShotKind,
        supplied: Vec<Coord>,
    ) -> Result<Vec<(Coord, Result<ShotOutcome, ShotError>)>, ShotError> {
        let salvo = self.plan(shooter, kind, supplied)?;
        let results = salvo
            .targets
            .iter()
            .map(|&coord| (coord, resolve(shooter.view_mut(), defender, coord)))
            .collect();
        complete(shooter, kind);
        Ok(results)
    }
}

/// Shot kinds `shooter` may use right now, `Standard` first.
pub fn available(shooter: &Duelist) -> Vec<ShotKind> {
    ShotKind::ALL
        .into_iter()
        .filter(|&kind| authorize(shooter, kind).is_ok())
        .collect()
}

/// Check the precondition of `kind`: its unit must be alive with the
/// ability switched on.
pub fn authorize(shooter: &Duelist, kind: ShotKind) -> Result<(), ShotError> {
    if kind == ShotKind::Standard {
        return Ok(());
    }
    let usable = shooter
        .unit_for(kind)
        .and_then(|id| shooter.unit(id).ok())
        .is_some_and(|unit| unit.can_fire());
    if usable {
        Ok(())
    } else {
        Err(ShotError::Unavailable(kind))
    }
}

/// Inclusive bounds on the number of coordinates the client supplies.
pub fn target_range(shooter: &Duelist, kind: ShotKind) -> (usize, usize) {
    let ability = shooter
        .unit_for(kind)
        .and_then(|id| shooter.unit(id).ok())
        .and_then(|unit| unit.spec().ability());
    match (kind, ability) {
        (ShotKind::Standard, _) => (1, 1),
        (_, Some(Ability::Area { max_targets })) => (1, max_targets),
        (_, Some(Ability::HeavyLine { max_targets })) => (1, max_targets),
        _ => (0, 0),
    }
}

/// Resolve a single target of a salvo.
///
/// Nothing is changed when the target was already resolved; the caller
/// reports that target and moves on to the next one.
pub fn resolve(
    view: &mut OpponentView,
    defender: &mut Duelist,
    coord: Coord,
) -> Result<ShotOutcome, ShotError> {
    if !coord.in_bounds() {
        return Err(ShotError::OutOfBounds(coord));
    }
    if view.is_resolved(coord) {
        return Err(ShotError::AlreadyResolvedTarget(coord));
    }
    let outcome = match defender.receive_hit(coord)? {
        None => ShotOutcome::Miss,
        Some((_, HitOutcome::StillAlive | HitOutcome::AlreadyDestroyed)) => ShotOutcome::Hit,
        Some((id, HitOutcome::JustDestroyed)) => {
            let unit = defender.unit(id)?;
            ShotOutcome::Destroyed {
                unit: unit.name().to_string(),
                cells: unit.cells().to_vec(),
            }
        }
    };
    view.mark(coord, outcome.mark())?;
    if let ShotOutcome::Destroyed { cells, .. } = &outcome {
        view.reveal_destroyed(cells);
    }
    Ok(outcome)
}

/// Flip the ability of the unit behind `kind` once its salvo is done.
pub fn complete(shooter: &mut Duelist, kind: ShotKind) {
    if kind == ShotKind::Standard {
        return;
    }
    if let Some(unit) = shooter
        .unit_for(kind)
        .and_then(|id| shooter.unit_mut(id).ok())
    {
        unit.toggle_ability();
    }
}
