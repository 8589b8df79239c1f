//! Client side of a networked duel.

use crate::common::Side;
use crate::player::Player;
use crate::protocol::{Event, Message, Verdict, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Connects a local [`Player`] to a duel server.
///
/// The node answers prompts with the player's replies and hands every event
/// to it until the server announces the end of the match.
pub struct ClientNode<T> {
    player: Box<dyn Player>,
    transport: T,
    name: String,
}

impl<T: Transport> ClientNode<T> {
    pub fn new(player: Box<dyn Player>, transport: T, name: impl Into<String>) -> Self {
        Self {
            player,
            transport,
            name: name.into(),
        }
    }

    /// Send `Hello` and wait for the seat assignment.
    async fn handshake(&mut self) -> anyhow::Result<Side> {
        self.transport
            .send(Message::Hello {
                version: PROTOCOL_VERSION,
                name: self.name.clone(),
            })
            .await?;

        match self.transport.recv().await? {
            Message::Welcome { version, side } if version == PROTOCOL_VERSION => Ok(side),
            Message::Welcome { version, .. } => {
                log::warn!(
                    "Handshake protocol version mismatch: expected {}, server responded with {}",
                    PROTOCOL_VERSION,
                    version
                );
                Err(anyhow::anyhow!(
                    "Protocol version mismatch in Welcome: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ))
            }
            other => {
                log::warn!("Expected Welcome, got unexpected message: {:?}", other);
                Err(anyhow::anyhow!(
                    "Expected Welcome, got unexpected message (closing session)"
                ))
            }
        }
    }

    /// Play until the server reports the end of the match.
    pub async fn run(&mut self) -> anyhow::Result<Verdict> {
        let side = self.handshake().await?;
        log::info!("joined the match as side {}", side);

        loop {
            let reply = match self.transport.recv().await? {
                Message::PlaceUnit(request) => Message::Placement {
                    cells: self.player.place_unit(&request).await?,
                },
                Message::ChooseShot(request) => Message::ShotChoice {
                    token: self.player.choose_shot(&request).await?,
                },
                Message::ChooseTargets(request) => Message::Targets {
                    cells: self.player.choose_targets(&request).await?,
                },
                Message::Event(event) => {
                    self.player.notify(&event).await?;
                    if let Event::MatchFinished { verdict, .. } = event {
                        return Ok(verdict);
                    }
                    continue;
                }
                other => {
                    log::warn!("Expected a prompt or event, got unexpected message: {:?}", other);
                    return Err(anyhow::anyhow!(
                        "Expected a prompt or event, got unexpected message (closing session)"
                    ));
                }
            };
            self.transport.send(reply).await?;
        }
    }
}
