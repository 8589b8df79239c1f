use crate::common::Side;
use crate::coord::Coord;
use crate::protocol::{Event, Message, PlacementRequest, ShotRequest, TargetRequest, PROTOCOL_VERSION};
use crate::transport::Transport;

use super::Player;

/// Server-side stand-in for a client connected over a [`Transport`].
///
/// Every prompt is sent as a message and the matching reply awaited. A
/// reply of the wrong kind is treated as a protocol violation and ends the
/// session.
pub struct RemotePlayer<T> {
    transport: T,
    name: String,
}

impl<T: Transport> RemotePlayer<T> {
    /// Run the server half of the handshake: expect `Hello` with our
    /// protocol version and answer with `Welcome` carrying `side`.
    pub async fn accept(transport: T, side: Side) -> anyhow::Result<Self> {
        let mut player = Self::hello(transport).await?;
        player.welcome(side).await?;
        Ok(player)
    }

    /// Wait for the client's `Hello`. The client is not told its side yet.
    pub async fn hello(mut transport: T) -> anyhow::Result<Self> {
        let name = match transport.recv().await? {
            Message::Hello { version, name } if version == PROTOCOL_VERSION => name,
            Message::Hello { version, .. } => {
                log::warn!(
                    "Handshake protocol version mismatch: expected {}, client sent {}",
                    PROTOCOL_VERSION,
                    version
                );
                return Err(anyhow::anyhow!(
                    "Protocol version mismatch in Hello: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ));
            }
            other => {
                log::warn!("Expected Hello, got unexpected message: {:?}", other);
                return Err(anyhow::anyhow!(
                    "Expected Hello, got unexpected message (closing session)"
                ));
            }
        };
        Ok(Self { transport, name })
    }

    /// Finish the handshake by seating the client on `side`.
    pub async fn welcome(&mut self, side: Side) -> anyhow::Result<()> {
        self.transport
            .send(Message::Welcome {
                version: PROTOCOL_VERSION,
                side,
            })
            .await?;
        log::info!("{} joined as side {}", self.name, side);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn unexpected(expected: &str, got: &Message) -> anyhow::Error {
    log::warn!("Expected {}, got unexpected message: {:?}", expected, got);
    anyhow::anyhow!("Expected {}, got unexpected message (closing session)", expected)
}

#[async_trait::async_trait]
impl<T: Transport> Player for RemotePlayer<T> {
    async fn place_unit(&mut self, request: &PlacementRequest) -> anyhow::Result<Vec<Coord>> {
        self.transport
            .send(Message::PlaceUnit(request.clone()))
            .await?;
        match self.transport.recv().await? {
            Message::Placement { cells } => Ok(cells),
            other => Err(unexpected("Placement", &other)),
        }
    }

    async fn choose_shot(&mut self, request: &ShotRequest) -> anyhow::Result<String> {
        self.transport
            .send(Message::ChooseShot(request.clone()))
            .await?;
        match self.transport.recv().await? {
            Message::ShotChoice { token } => Ok(token),
            other => Err(unexpected("ShotChoice", &other)),
        }
    }

    async fn choose_targets(&mut self, request: &TargetRequest) -> anyhow::Result<Vec<Coord>> {
        self.transport
            .send(Message::ChooseTargets(request.clone()))
            .await?;
        match self.transport.recv().await? {
            Message::Targets { cells } => Ok(cells),
            other => Err(unexpected("Targets", &other)),
        }
    }

    async fn notify(&mut self, event: &Event) -> anyhow::Result<()> {
        self.transport.send(Message::Event(event.clone())).await
    }
}
