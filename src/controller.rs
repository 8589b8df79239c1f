//! Match wiring: shared state, the two sessions and their outcome.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;

use crate::common::Side;
use crate::config::MatchConfig;
use crate::duelist::Duelist;
use crate::player::Player;
use crate::protocol::Event;
use crate::session::Session;
use crate::shot::ShotResolver;
use crate::turn::{MatchResult, TurnArbiter};

/// State shared by the two sessions of one match.
///
/// When both duelists are needed at once they are always locked A first,
/// then B. No guard is ever held across an `.await`.
pub(crate) struct Match {
    duelists: [Mutex<Duelist>; 2],
    pub(crate) arbiter: TurnArbiter,
    inboxes: [mpsc::UnboundedSender<Event>; 2],
}

impl Match {
    pub(crate) fn duelist(&self, side: Side) -> MutexGuard<'_, Duelist> {
        self.duelists[side.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock both duelists and return them as `(shooter, defender)`.
    pub(crate) fn pair(&self, shooter: Side) -> (MutexGuard<'_, Duelist>, MutexGuard<'_, Duelist>) {
        let a = self.duelist(Side::A);
        let b = self.duelist(Side::B);
        match shooter {
            Side::A => (a, b),
            Side::B => (b, a),
        }
    }

    /// Queue `event` for one side.
    pub(crate) fn send(&self, side: Side, event: Event) {
        // The receiver only goes away once its session has returned.
        let _ = self.inboxes[side.index()].send(event);
    }

    /// Queue `event` for both sides.
    pub(crate) fn publish(&self, event: Event) {
        self.send(Side::A, event.clone());
        self.send(Side::B, event);
    }
}

/// Outcome of a completed match.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub result: MatchResult,
    pub opening: Side,
    /// Final state of both duelists, indexed by [`Side::index`].
    pub duelists: [Duelist; 2],
}

impl MatchReport {
    pub fn winner(&self) -> Option<Side> {
        self.result.winner()
    }

    pub fn duelist(&self, side: Side) -> &Duelist {
        &self.duelists[side.index()]
    }
}

/// Runs one match between two players.
pub struct MatchController {
    config: MatchConfig,
    players: [Box<dyn Player>; 2],
    names: [String; 2],
}

impl MatchController {
    pub fn new(config: MatchConfig, player_a: Box<dyn Player>, player_b: Box<dyn Player>) -> Self {
        Self {
            config,
            players: [player_a, player_b],
            names: [String::from("Player A"), String::from("Player B")],
        }
    }

    pub fn with_names(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.names = [a.into(), b.into()];
        self
    }

    /// Play the match to its end.
    ///
    /// Each side runs in its own task; the call returns once both have
    /// delivered their final notifications.
    pub async fn run(self) -> anyhow::Result<MatchReport> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let opening = if rng.random() { Side::A } else { Side::B };

        let [name_a, name_b] = self.names;
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let shared = Arc::new(Match {
            duelists: [
                Mutex::new(Duelist::new(Side::A, name_a)),
                Mutex::new(Duelist::new(Side::B, name_b)),
            ],
            arbiter: TurnArbiter::new(opening),
            inboxes: [tx_a, tx_b],
        });
        log::info!("match starting, side {} opens", opening);

        let [player_a, player_b] = self.players;
        let session_a = Session::new(
            Side::A,
            player_a,
            rx_a,
            Arc::clone(&shared),
            ShotResolver::new(self.config.pacing, SmallRng::seed_from_u64(rng.random())),
        );
        let session_b = Session::new(
            Side::B,
            player_b,
            rx_b,
            Arc::clone(&shared),
            ShotResolver::new(self.config.pacing, SmallRng::seed_from_u64(rng.random())),
        );

        let task_a = tokio::spawn(session_a.run());
        let task_b = tokio::spawn(session_b.run());
        let (result, _) = tokio::try_join!(task_a, task_b)?;

        match result {
            MatchResult::Won(side) => log::info!("match finished, side {} won", side),
            MatchResult::Aborted { lost } => log::info!("match aborted, side {} dropped", lost),
        }

        let duelists = [
            shared.duelist(Side::A).clone(),
            shared.duelist(Side::B).clone(),
        ];
        Ok(MatchReport {
            result,
            opening,
            duelists,
        })
    }
}
