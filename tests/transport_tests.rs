use naval_duel::transport::tcp::MAX_MESSAGE_SIZE;
use naval_duel::{
    Event, InMemoryTransport, Message, PlacementRequest, Side, TcpTransport, Transport,
    PROTOCOL_VERSION,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::Duration;

fn sample_prompt() -> Message {
    Message::PlaceUnit(PlacementRequest {
        unit: "HQ".to_string(),
        shape: (1, 2),
        length: 2,
        occupied: vec!["B2".parse().unwrap()],
        notice: Some("B2 is already occupied".to_string()),
    })
}

#[tokio::test]
async fn in_memory_pair_delivers_in_order() -> anyhow::Result<()> {
    let (mut left, mut right) = InMemoryTransport::pair();
    left.send(sample_prompt()).await?;
    left.send(Message::Event(Event::TurnChanged { active: Side::B }))
        .await?;

    assert_eq!(right.recv().await?, sample_prompt());
    assert_eq!(
        right.recv().await?,
        Message::Event(Event::TurnChanged { active: Side::B })
    );

    right
        .send(Message::ShotChoice {
            token: "S".to_string(),
        })
        .await?;
    assert!(matches!(left.recv().await?, Message::ShotChoice { .. }));
    Ok(())
}

#[tokio::test]
async fn in_memory_peer_drop_is_an_error() {
    let (mut left, right) = InMemoryTransport::pair();
    drop(right);
    let err = left.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed"));
    assert!(left.send(sample_prompt()).await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_frames_round_trip() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut transport = TcpTransport::new(socket);
        let hello = transport.recv().await.unwrap();
        transport
            .send(Message::Welcome {
                version: PROTOCOL_VERSION,
                side: Side::B,
            })
            .await
            .unwrap();
        transport.send(sample_prompt()).await.unwrap();
        hello
    });

    let mut client = TcpTransport::connect(addr).await?;
    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
            name: "tester".to_string(),
        })
        .await?;
    assert_eq!(
        client.recv().await?,
        Message::Welcome {
            version: PROTOCOL_VERSION,
            side: Side::B
        }
    );
    assert_eq!(client.recv().await?, sample_prompt());
    assert!(matches!(server.await?, Message::Hello { .. }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_oversized_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket
            .write_all(&(MAX_MESSAGE_SIZE + 1).to_be_bytes())
            .await
            .unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut client = TcpTransport::connect(addr).await?;
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"));
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_zero_length_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0u8, 0, 0, 0]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut client = TcpTransport::connect(addr).await?;
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("length: 0"));
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_reports_closed_peer() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut client = TcpTransport::connect(addr).await?;
    server.await?;
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("by peer"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_garbage_payload() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&4u32.to_be_bytes()).await.unwrap();
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut client = TcpTransport::connect(addr).await?;
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("Deserialization"));
    server.await?;
    Ok(())
}
