//! The per-side task of a match.
//!
//! A session walks its player through placement, then waits for its turn
//! while forwarding events. Every prompt is raced against the end of the
//! match so that a dropped opponent releases a side blocked on input.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use tokio::sync::mpsc;

use crate::common::{ShotError, Side};
use crate::controller::Match;
use crate::player::Player;
use crate::protocol::{Event, PlacementRequest, ShotRequest, TargetRequest, Verdict};
use crate::shot::{self, Salvo, ShotKind, ShotResolver};
use crate::turn::{MatchResult, Turn, TurnArbiter};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player stopped answering; the match is aborted.
    #[error("player connection lost: {0}")]
    ConnectionLost(anyhow::Error),
    /// The match finished while this side was busy.
    #[error("match already ended")]
    MatchEnded,
}

/// Await `reply` unless the match ends first.
async fn guarded<T>(
    arbiter: &TurnArbiter,
    reply: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, SessionError> {
    tokio::select! {
        biased;
        _ = arbiter.ended() => Err(SessionError::MatchEnded),
        reply = reply => reply.map_err(SessionError::ConnectionLost),
    }
}

/// Delay between two targets of a salvo.
async fn pace(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

enum Wake {
    Event(Event),
    Turn(Turn),
}

pub struct Session {
    side: Side,
    player: Box<dyn Player>,
    inbox: mpsc::UnboundedReceiver<Event>,
    shared: Arc<Match>,
    resolver: ShotResolver<SmallRng>,
}

impl Session {
    pub(crate) fn new(
        side: Side,
        player: Box<dyn Player>,
        inbox: mpsc::UnboundedReceiver<Event>,
        shared: Arc<Match>,
        resolver: ShotResolver<SmallRng>,
    ) -> Self {
        Self {
            side,
            player,
            inbox,
            shared,
            resolver,
        }
    }

    /// Drive this side to the end of the match and report how it ended.
    pub async fn run(mut self) -> MatchResult {
        let outcome = match self.setup().await {
            Ok(()) => self.battle().await,
            Err(e) => Err(e),
        };

        let connected = match outcome {
            Err(SessionError::ConnectionLost(e)) => {
                log::warn!("side {} lost its player: {:#}", self.side, e);
                self.shared.arbiter.finish(MatchResult::Aborted { lost: self.side });
                false
            }
            _ => true,
        };

        let result = self.shared.arbiter.ended().await;
        if connected {
            self.farewell(result).await;
        }
        result
    }

    /// Best-effort delivery of the remaining events and the verdict.
    async fn farewell(&mut self, result: MatchResult) {
        if let Err(e) = self.flush().await {
            log::debug!("side {}: {}", self.side, e);
            return;
        }
        let verdict = match result {
            MatchResult::Won(side) if side == self.side => Verdict::Won,
            MatchResult::Won(_) => Verdict::Lost,
            MatchResult::Aborted { .. } => Verdict::Aborted,
        };
        let event = Event::MatchFinished {
            winner: result.winner(),
            verdict,
        };
        if let Err(e) = self.player.notify(&event).await {
            log::debug!("side {} missed the final verdict: {:#}", self.side, e);
        }
    }

    /// Forward every queued event to the player.
    async fn flush(&mut self) -> Result<(), SessionError> {
        while let Ok(event) = self.inbox.try_recv() {
            self.player
                .notify(&event)
                .await
                .map_err(SessionError::ConnectionLost)?;
        }
        Ok(())
    }

    async fn setup(&mut self) -> Result<(), SessionError> {
        let mut notice = None;
        loop {
            let (id, request) = {
                let duelist = self.shared.duelist(self.side);
                let Some(id) = duelist.next_unplaced() else {
                    break;
                };
                let spec = *duelist.units()[id].spec();
                let request = PlacementRequest {
                    unit: spec.name().to_string(),
                    shape: spec.shape(),
                    length: spec.length(),
                    occupied: duelist.grid().occupied().iter().collect(),
                    notice: notice.take(),
                };
                (id, request)
            };

            let cells = guarded(&self.shared.arbiter, self.player.place_unit(&request)).await?;
            let placed = self
                .shared
                .duelist(self.side)
                .place_unit(id, cells.clone());
            match placed {
                Ok(()) => {
                    let event = Event::UnitPlaced {
                        unit: request.unit,
                        cells,
                    };
                    self.player
                        .notify(&event)
                        .await
                        .map_err(SessionError::ConnectionLost)?;
                }
                Err(e) => {
                    log::debug!("side {} placement rejected: {}", self.side, e);
                    notice = Some(e.to_string());
                }
            }
        }

        self.shared.duelist(self.side).mark_ready();
        log::debug!("side {} placed its fleet", self.side);
        let shared = &self.shared;
        shared
            .arbiter
            .ready_with(self.side, |opening| {
                for side in Side::BOTH {
                    shared.send(side, Event::BattleStarted { side, opening });
                }
            })
            .map_err(|_| SessionError::MatchEnded)?;
        Ok(())
    }

    async fn battle(&mut self) -> Result<(), SessionError> {
        let shared = Arc::clone(&self.shared);
        loop {
            let wake = tokio::select! {
                biased;
                Some(event) = self.inbox.recv() => Wake::Event(event),
                turn = shared.arbiter.wait_for_turn(self.side) => Wake::Turn(turn),
            };
            match wake {
                Wake::Event(event) => self
                    .player
                    .notify(&event)
                    .await
                    .map_err(SessionError::ConnectionLost)?,
                Wake::Turn(Turn::Ended(_)) => return Ok(()),
                Wake::Turn(Turn::Granted) => {
                    self.flush().await?;
                    if !self.take_turn().await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Prompt until a valid shot has been chosen and planned.
    async fn choose_salvo(&mut self) -> Result<Salvo, SessionError> {
        let mut shot_notice = None;
        'choose: loop {
            let available = shot::available(&self.shared.duelist(self.side));
            let request = ShotRequest {
                available,
                notice: shot_notice.take(),
            };
            let token = guarded(&self.shared.arbiter, self.player.choose_shot(&request)).await?;
            let kind = match token.parse::<ShotKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    shot_notice = Some(e.to_string());
                    continue;
                }
            };
            let authorized = shot::authorize(&self.shared.duelist(self.side), kind);
            if let Err(e) = authorized {
                shot_notice = Some(e.to_string());
                continue;
            }

            if !kind.takes_targets() {
                let planned = {
                    let shooter = self.shared.duelist(self.side);
                    self.resolver.plan(&shooter, kind, Vec::new())
                };
                match planned {
                    Ok(salvo) => return Ok(salvo),
                    Err(e) => {
                        shot_notice = Some(e.to_string());
                        continue 'choose;
                    }
                }
            }

            let mut target_notice = None;
            loop {
                let request = {
                    let shooter = self.shared.duelist(self.side);
                    let (min, max) = shot::target_range(&shooter, kind);
                    TargetRequest {
                        kind,
                        min,
                        max,
                        view: shooter.view().snapshot(),
                        notice: target_notice.take(),
                    }
                };
                let supplied =
                    guarded(&self.shared.arbiter, self.player.choose_targets(&request)).await?;
                let planned = {
                    let shooter = self.shared.duelist(self.side);
                    self.resolver.plan(&shooter, kind, supplied)
                };
                match planned {
                    Ok(salvo) => return Ok(salvo),
                    Err(e) => {
                        log::debug!("side {} targets rejected: {}", self.side, e);
                        target_notice = Some(e.to_string());
                    }
                }
            }
        }
    }

    /// Play one turn. Returns `false` once the match is over.
    async fn take_turn(&mut self) -> Result<bool, SessionError> {
        let salvo = self.choose_salvo().await?;
        let side = self.side;
        log::debug!("side {} fires {} at {:?}", side, salvo.kind, salvo.targets);

        self.shared.publish(Event::ShotFired {
            shooter: side,
            kind: salvo.kind,
        });
        for (i, &coord) in salvo.targets.iter().enumerate() {
            if i > 0 {
                pace(salvo.pacing).await;
            }
            let resolved = {
                let (mut shooter, mut defender) = self.shared.pair(side);
                shot::resolve(shooter.view_mut(), &mut defender, coord)
            };
            match resolved {
                Ok(outcome) => self.shared.publish(Event::ShotResolved {
                    shooter: side,
                    coord,
                    outcome,
                }),
                Err(e) => {
                    if !matches!(e, ShotError::AlreadyResolvedTarget(_)) {
                        log::warn!("side {} target {} failed: {}", side, coord, e);
                    }
                    self.shared.publish(Event::TargetRejected {
                        shooter: side,
                        coord,
                    });
                }
            }
            self.flush().await?;
        }

        shot::complete(&mut self.shared.duelist(side), salvo.kind);
        let defeated = self.shared.duelist(side.other()).all_destroyed();
        if defeated {
            self.shared.arbiter.finish(MatchResult::Won(side));
            return Ok(false);
        }

        if self.shared.arbiter.is_finished() {
            return Ok(false);
        }
        let next = side.other();
        self.shared.publish(Event::TurnChanged { active: next });
        match self.shared.arbiter.handoff(side) {
            Ok(_) => {
                self.flush().await?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
