//! Runs alone in its own binary: it exhausts the process's file descriptors.

use std::fs::File;

use naval_duel::{AiPlayer, ClientNode, Lobby, MatchConfig, TcpTransport, Verdict};
use tokio::time::{sleep, timeout, Duration};

const MAX_HELD: usize = 200_000;

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn lobby_keeps_serving_after_accept_errors() -> anyhow::Result<()> {
    let lobby = Lobby::bind("127.0.0.1:0", MatchConfig::with_seed(17)).await?;
    let addr = lobby.local_addr()?;

    // Sits in the listen backlog while the process is out of descriptors.
    let early = TcpTransport::connect(addr).await?;

    let mut held = Vec::new();
    while held.len() < MAX_HELD {
        match File::open("/dev/null") {
            Ok(file) => held.push(file),
            Err(_) => break,
        }
    }
    let exhausted = held.len() < MAX_HELD;

    let server = tokio::spawn(lobby.serve());
    sleep(Duration::from_millis(300)).await;
    assert!(
        !server.is_finished(),
        "lobby stopped after a failed accept (descriptors exhausted: {})",
        exhausted
    );
    drop(held);

    let first = tokio::spawn(async move {
        let mut node = ClientNode::new(Box::new(AiPlayer::seeded(1)), early, "early");
        node.run().await
    });
    let second = tokio::spawn(async move {
        let transport = TcpTransport::connect(addr).await?;
        let mut node = ClientNode::new(Box::new(AiPlayer::seeded(2)), transport, "late");
        node.run().await
    });

    let (a, b) = timeout(Duration::from_secs(60), async { tokio::try_join!(first, second) })
        .await??;
    let (a, b) = (a?, b?);
    assert!(matches!(
        (a, b),
        (Verdict::Won, Verdict::Lost) | (Verdict::Lost, Verdict::Won)
    ));
    assert!(!server.is_finished());
    server.abort();
    Ok(())
}
