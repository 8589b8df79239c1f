mod bitboard;
mod common;
mod config;
pub mod client_node;
pub mod controller;
pub mod coord;
mod duelist;
mod grid;
mod logging;
pub mod player;
pub mod protocol;
pub mod server;
pub mod session;
pub mod shot;
pub mod transport;
pub mod turn;
mod unit;

pub use bitboard::CellMask;
pub use client_node::ClientNode;
pub use common::*;
pub use config::*;
pub use controller::{MatchController, MatchReport};
pub use coord::{Coord, CoordError};
pub use duelist::Duelist;
pub use grid::{OpponentView, OwnGrid, UnitId, ViewSnapshot};
pub use logging::{init_logging, init_logging_with, LOG_ENV};
pub use player::{AiPlayer, CliPlayer, Player, RemotePlayer};
pub use protocol::*;
pub use server::Lobby;
pub use session::SessionError;
pub use shot::{Salvo, ShotKind, ShotResolver};
pub use transport::{InMemoryTransport, TcpTransport, Transport};
pub use turn::{MatchResult, Turn, TurnArbiter, TurnState};
pub use unit::{random_footprint, Ability, Orientation, Unit, UnitSpec};
