//! Exclusive turn control between the two sessions of a match.
//!
//! The arbiter moves through `Unset -> Active(side) -> Finished`. Each seat
//! has its own [`Notify`], so a handoff wakes only the side that receives the
//! turn. `Notify::notify_one` keeps a permit when nobody is waiting yet,
//! which makes the check-then-wait in [`TurnArbiter::wait_for_turn`] free of
//! lost wakeups.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{watch, Notify};

use crate::common::{Side, TurnError};

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Won(Side),
    /// The session of `lost` dropped; nobody wins.
    Aborted { lost: Side },
}

impl MatchResult {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchResult::Won(side) => Some(*side),
            MatchResult::Aborted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for both duelists to finish placement.
    Unset,
    Active(Side),
    Finished(MatchResult),
}

/// Answer to [`TurnArbiter::wait_for_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Granted,
    Ended(MatchResult),
}

struct Inner {
    state: TurnState,
    ready: [bool; 2],
    opening: Side,
}

pub struct TurnArbiter {
    inner: Mutex<Inner>,
    seats: [Notify; 2],
    finished: watch::Sender<Option<MatchResult>>,
}

impl TurnArbiter {
    /// `opening` gets the first turn once both sides are ready.
    pub fn new(opening: Side) -> Self {
        let (finished, _) = watch::channel(None);
        Self {
            inner: Mutex::new(Inner {
                state: TurnState::Unset,
                ready: [false; 2],
                opening,
            }),
            seats: [Notify::new(), Notify::new()],
            finished,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> TurnState {
        self.lock().state
    }

    /// The side holding the turn, if battle is under way.
    pub fn active(&self) -> Option<Side> {
        match self.lock().state {
            TurnState::Active(side) => Some(side),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        match self.lock().state {
            TurnState::Finished(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result().is_some()
    }

    /// Record that `side` has placed all of its units. The second side to
    /// report starts the battle and gets back the opening side.
    pub fn ready(&self, side: Side) -> Result<Option<Side>, TurnError> {
        self.ready_with(side, |_| {})
    }

    /// Like [`TurnArbiter::ready`], but runs `announce` with the opening side
    /// before any seat can observe the battle as started. `announce` runs
    /// under the arbiter's lock and must not call back into it.
    pub fn ready_with(
        &self,
        side: Side,
        announce: impl FnOnce(Side),
    ) -> Result<Option<Side>, TurnError> {
        let opening = {
            let mut inner = self.lock();
            match inner.state {
                TurnState::Finished(_) => return Err(TurnError::Finished),
                TurnState::Active(_) => return Ok(None),
                TurnState::Unset => {}
            }
            inner.ready[side.index()] = true;
            if !inner.ready.iter().all(|r| *r) {
                return Ok(None);
            }
            announce(inner.opening);
            inner.state = TurnState::Active(inner.opening);
            inner.opening
        };
        log::debug!("both sides ready, {} opens", opening);
        self.seats[opening.index()].notify_one();
        Ok(Some(opening))
    }

    /// Wait until `side` holds the turn or the match is over.
    pub async fn wait_for_turn(&self, side: Side) -> Turn {
        loop {
            let notified = self.seats[side.index()].notified();
            let state = self.lock().state;
            match state {
                TurnState::Active(active) if active == side => return Turn::Granted,
                TurnState::Finished(result) => return Turn::Ended(result),
                _ => {}
            }
            notified.await;
        }
    }

    /// Pass the turn from `side` to its opponent. Only the active side may
    /// hand off. Returns the newly active side.
    pub fn handoff(&self, side: Side) -> Result<Side, TurnError> {
        let next = {
            let mut inner = self.lock();
            match inner.state {
                TurnState::Active(active) if active == side => {}
                TurnState::Finished(_) => return Err(TurnError::Finished),
                _ => return Err(TurnError::NotActive(side)),
            }
            let next = side.other();
            inner.state = TurnState::Active(next);
            next
        };
        self.seats[next.index()].notify_one();
        Ok(next)
    }

    /// End the match. Both seats are released with [`Turn::Ended`].
    /// Returns `false` if the match had already finished; the first result
    /// sticks.
    pub fn finish(&self, result: MatchResult) -> bool {
        {
            let mut inner = self.lock();
            if let TurnState::Finished(_) = inner.state {
                return false;
            }
            inner.state = TurnState::Finished(result);
        }
        for seat in &self.seats {
            seat.notify_one();
        }
        self.finished.send_replace(Some(result));
        true
    }

    /// Resolves once the match has finished.
    pub async fn ended(&self) -> MatchResult {
        let mut rx = self.finished.subscribe();
        loop {
            let current = *rx.borrow_and_update();
            if let Some(result) = current {
                return result;
            }
            if rx.changed().await.is_err() {
                // The sender lives as long as `self`.
                std::future::pending::<()>().await;
            }
        }
    }
}
