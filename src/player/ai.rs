use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bitboard::CellMask;
use crate::coord::Coord;
use crate::protocol::{PlacementRequest, ShotRequest, TargetRequest};
use crate::shot::ShotKind;
use crate::unit::random_footprint;

use super::Player;

/// Order in which the AI reaches for its shots.
const PREFERENCE: [ShotKind; 4] = [
    ShotKind::Barrage,
    ShotKind::HeavyLine,
    ShotKind::Area,
    ShotKind::Standard,
];

/// Simple AI player: random placement, abilities first, hunts around
/// unresolved hits and otherwise shoots at random unknown cells.
pub struct AiPlayer {
    rng: SmallRng,
}

impl AiPlayer {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    fn pick_targets(&mut self, request: &TargetRequest) -> Vec<Coord> {
        let view = &request.view;
        let mut unknown: Vec<Coord> = Coord::all().filter(|c| !view.is_resolved(*c)).collect();
        unknown.shuffle(&mut self.rng);

        let mut hunt: Vec<Coord> = view
            .hits
            .iter()
            .flat_map(|hit| hit.neighbours().collect::<Vec<_>>())
            .filter(|c| !view.is_resolved(*c))
            .collect();
        hunt.shuffle(&mut self.rng);

        let mut chosen = CellMask::new();
        let mut targets = Vec::with_capacity(request.max);
        for coord in hunt.into_iter().chain(unknown) {
            if targets.len() == request.max {
                break;
            }
            if chosen.contains(coord) {
                continue;
            }
            chosen.insert(coord);
            targets.push(coord);
        }
        targets
    }
}

#[async_trait::async_trait]
impl Player for AiPlayer {
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        let occupied: CellMask = request.occupied.iter().copied().collect();
        random_footprint(&mut self.rng, request.shape, occupied)
            .ok_or_else(|| anyhow::anyhow!("no room left for {}", request.unit))
    }

    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String> {
        let kind = PREFERENCE
            .into_iter()
            .find(|kind| request.available.contains(kind))
            .unwrap_or(ShotKind::Standard);
        Ok(kind.token().to_string())
    }

    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        let targets = self.pick_targets(request);
        if targets.len() < request.min {
            return Err(anyhow::anyhow!("no unresolved cells left to target"));
        }
        Ok(targets)
    }
}
