//! Player trait and implementations
//!
//! A `Player` answers the prompts of a match for one duelist and receives the
//! events it should see. The match controller only talks to this trait:
//! - `AiPlayer`: random placement, hunts around known hits
//! - `CliPlayer`: interactive terminal player
//! - `RemotePlayer`: forwards prompts to a client over a `Transport`

use crate::coord::Coord;
use crate::protocol::{Event, PlacementRequest, ShotRequest, TargetRequest};

/// Interface implemented by everything that can sit in a seat.
///
/// Any error returned here means the player is gone; the controller aborts
/// the match.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Cells for the unit described by `request`.
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>>;

    /// Raw shot token, e.g. `"S"`. Validated by the controller.
    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String>;

    /// Target coordinates for the chosen shot.
    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>>;

    /// Inform the player of something that happened in the match.
    async fn notify(&mut self, _event: &Event) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<P: Player + ?Sized> Player for Box<P> {
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        (**self).place_unit(request).await
    }

    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String> {
        (**self).choose_shot(request).await
    }

    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        (**self).choose_targets(request).await
    }

    async fn notify(&mut self, event: &Event) -> anyhow::Result<()> {
        (**self).notify(event).await
    }
}

pub mod ai;
pub use ai::AiPlayer;

pub mod cli;
pub use cli::CliPlayer;

pub mod remote;
pub use remote::RemotePlayer;
