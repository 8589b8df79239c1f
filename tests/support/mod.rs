#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use naval_duel::{
    Coord, Duelist, Event, Orientation, PlacementRequest, Player, ShotRequest, Side,
    TargetRequest, FLEET,
};

/// Top-left corner of every catalog unit in the fixed test layout, all
/// horizontal. HQ sits on B2;B3.
pub const ORIGINS: [&str; 6] = ["D1", "G1", "B2", "J1", "D8", "A9"];

pub fn c(s: &str) -> Coord {
    s.parse().unwrap()
}

pub fn cells(list: &str) -> Vec<Coord> {
    naval_duel::coord::parse_list(list).unwrap()
}

/// Footprints of the fixed layout, in catalog order.
pub fn layout() -> Vec<Vec<Coord>> {
    FLEET
        .iter()
        .zip(ORIGINS)
        .map(|(spec, origin)| spec.footprint(c(origin), Orientation::Horizontal).unwrap())
        .collect()
}

pub fn placed_duelist(side: Side) -> Duelist {
    let mut duelist = Duelist::new(side, format!("side {}", side));
    for (id, footprint) in layout().into_iter().enumerate() {
        duelist.place_unit(id, footprint).unwrap();
    }
    duelist
}

/// Cells of the fixed layout that hold no unit.
pub fn empty_cells() -> Vec<Coord> {
    let taken: Vec<Coord> = layout().into_iter().flatten().collect();
    Coord::all().filter(|cell| !taken.contains(cell)).collect()
}

/// What a scripted player saw during a match.
#[derive(Default)]
pub struct Log {
    pub events: Vec<Event>,
    pub notices: Vec<String>,
}

/// Player that answers from pre-recorded queues and fails once a queue runs
/// dry.
pub struct Scripted {
    placements: VecDeque<Vec<Coord>>,
    shots: VecDeque<(String, Vec<Coord>)>,
    pending_targets: Option<Vec<Coord>>,
    log: Arc<Mutex<Log>>,
}

impl Scripted {
    pub fn new(
        placements: Vec<Vec<Coord>>,
        shots: Vec<(String, Vec<Coord>)>,
    ) -> (Self, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let player = Self {
            placements: placements.into(),
            shots: shots.into(),
            pending_targets: None,
            log: Arc::clone(&log),
        };
        (player, log)
    }

    /// Standard shots at every cell of `targets`, in order.
    pub fn standard_shots(targets: &[Coord]) -> Vec<(String, Vec<Coord>)> {
        targets.iter().map(|&t| ("S".to_string(), vec![t])).collect()
    }

    fn note(&self, notice: &Option<String>) {
        if let Some(n) = notice {
            self.log.lock().unwrap().notices.push(n.clone());
        }
    }
}

#[async_trait::async_trait]
impl Player for Scripted {
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        self.note(&request.notice);
        self.placements
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("placement script exhausted"))
    }

    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String> {
        self.note(&request.notice);
        let (token, targets) = self
            .shots
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("shot script exhausted"))?;
        self.pending_targets = Some(targets);
        Ok(token)
    }

    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        self.note(&request.notice);
        // A re-prompt for targets consumes the next scripted entry.
        match self.pending_targets.take() {
            Some(targets) => Ok(targets),
            None => self
                .shots
                .pop_front()
                .map(|(_, targets)| targets)
                .ok_or_else(|| anyhow::anyhow!("shot script exhausted")),
        }
    }

    async fn notify(&mut self, event: &Event) -> anyhow::Result<()> {
        self.log.lock().unwrap().events.push(event.clone());
        Ok(())
    }
}

/// Player that never answers a prompt.
pub struct Silent;

#[async_trait::async_trait]
impl Player for Silent {
    async fn place_unit(&mut self, _: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        std::future::pending().await
    }

    async fn choose_shot(&mut self, _: &ShotRequest) -> anyhow::Result<String> {
        std::future::pending().await
    }

    async fn choose_targets(&mut self, _: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        std::future::pending().await
    }
}
