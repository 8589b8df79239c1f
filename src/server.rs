//! TCP lobby: pairs incoming clients into matches.
//!
//! Every connection says `Hello` in its own task, so a slow or silent client
//! never holds up the others. Clients that finished the handshake are seated
//! in arrival order and learn their side from `Welcome`.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration};

use crate::common::Side;
use crate::config::MatchConfig;
use crate::controller::{MatchController, MatchReport};
use crate::player::RemotePlayer;
use crate::transport::TcpTransport;

/// Time a fresh connection gets to say `Hello`.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed `accept`, e.g. while the process is out of file
/// descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

type Greeted = RemotePlayer<TcpTransport>;

enum Wake {
    Accepted(std::io::Result<(TcpStream, SocketAddr)>),
    Greeted(Greeted),
}

/// Accepts clients and starts a match for every two of them.
pub struct Lobby {
    listener: TcpListener,
    config: MatchConfig,
    greeted_tx: mpsc::UnboundedSender<Greeted>,
    greeted: mpsc::UnboundedReceiver<Greeted>,
}

impl Lobby {
    pub async fn bind<A: ToSocketAddrs>(addr: A, config: MatchConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let (greeted_tx, greeted) = mpsc::unbounded_channel();
        Ok(Self {
            listener,
            config,
            greeted_tx,
            greeted,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the `Hello` exchange with a new connection in the background.
    fn greet(&self, stream: TcpStream, addr: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("set_nodelay on {} failed: {}", addr, e);
        }
        log::info!("connection from {}", addr);
        let greeted = self.greeted_tx.clone();
        tokio::spawn(async move {
            let hello = RemotePlayer::hello(TcpTransport::new(stream));
            match timeout(HANDSHAKE_TIMEOUT, hello).await {
                Ok(Ok(player)) => {
                    // The lobby went away; the connection closes with it.
                    let _ = greeted.send(player);
                }
                Ok(Err(e)) => log::warn!("handshake with {} failed: {:#}", addr, e),
                Err(_) => log::warn!("handshake with {} timed out", addr),
            }
        });
    }

    /// Wait for the next two clients and start their match in the
    /// background. Connection failures are logged and never end the wait.
    pub async fn next_match(&mut self) -> JoinHandle<anyhow::Result<MatchReport>> {
        let mut waiting: Option<Greeted> = None;
        let (player_a, player_b) = loop {
            let wake = tokio::select! {
                accepted = self.listener.accept() => Wake::Accepted(accepted),
                Some(player) = self.greeted.recv() => Wake::Greeted(player),
            };
            match wake {
                Wake::Accepted(Ok((stream, addr))) => self.greet(stream, addr),
                Wake::Accepted(Err(e)) => {
                    log::warn!("accept failed: {}", e);
                    sleep(ACCEPT_BACKOFF).await;
                }
                Wake::Greeted(mut player) => {
                    let side = if waiting.is_none() { Side::A } else { Side::B };
                    if let Err(e) = player.welcome(side).await {
                        log::warn!("{} left before the match: {:#}", player.name(), e);
                        continue;
                    }
                    match waiting.take() {
                        None => waiting = Some(player),
                        Some(first) => break (first, player),
                    }
                }
            }
        };

        let names = (player_a.name().to_string(), player_b.name().to_string());
        log::info!("pairing {} against {}", names.0, names.1);

        let controller = MatchController::new(self.config, Box::new(player_a), Box::new(player_b))
            .with_names(names.0, names.1);
        tokio::spawn(controller.run())
    }

    /// Serve matches for as long as the process runs.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        log::info!("lobby listening on {}", self.local_addr()?);
        loop {
            let handle = self.next_match().await;
            tokio::spawn(async move {
                match handle.await {
                    Ok(Ok(report)) => log::info!("match over: {:?}", report.result),
                    Ok(Err(e)) => log::warn!("match failed: {:#}", e),
                    Err(e) => log::error!("match task panicked: {}", e),
                }
            });
        }
    }
}
