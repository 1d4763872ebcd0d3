use broadside::protocol::{ClientEvent, ServerEvent};
use broadside::transport::{read_frame, write_frame, Transport, MAX_FRAME_SIZE};
use broadside::{Coord, ShipType, Slot, TcpTransport};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_frame_roundtrip() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let event = ClientEvent::PlaceShip {
        ship_type: ShipType::Cruiser,
        positions: vec![Coord::new(2, 0), Coord::new(2, 1), Coord::new(2, 2)],
    };
    write_frame(&mut client, &event).await.unwrap();
    let decoded: ClientEvent = read_frame(&mut server).await.unwrap();
    assert_eq!(decoded, event);
}

#[tokio::test]
async fn test_multiple_frames_in_sequence() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    write_frame(&mut client, &ClientEvent::Attack { row: 3, col: 4 })
        .await
        .unwrap();
    write_frame(&mut client, &ClientEvent::FinishPlacingShips)
        .await
        .unwrap();

    let first: ClientEvent = read_frame(&mut server).await.unwrap();
    let second: ClientEvent = read_frame(&mut server).await.unwrap();
    assert_eq!(first, ClientEvent::Attack { row: 3, col: 4 });
    assert_eq!(second, ClientEvent::FinishPlacingShips);
}

#[tokio::test]
async fn test_zero_length_frame_is_rejected() {
    let (mut client, mut server) = tokio::io::duplex(64);
    client.write_all(&0u32.to_be_bytes()).await.unwrap();

    let err = read_frame::<_, ClientEvent>(&mut server)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid frame length"));
}

#[tokio::test]
async fn test_oversized_frame_is_rejected() {
    let (mut client, mut server) = tokio::io::duplex(64);
    client
        .write_all(&(MAX_FRAME_SIZE + 1).to_be_bytes())
        .await
        .unwrap();

    let err = read_frame::<_, ClientEvent>(&mut server)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("frame too large"));
}

#[tokio::test]
async fn test_closed_peer_is_reported() {
    let (client, mut server) = tokio::io::duplex(64);
    drop(client);

    let err = read_frame::<_, ClientEvent>(&mut server)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("closed"));
}

#[tokio::test]
async fn test_tcp_transport_receives_server_events() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let event: ClientEvent = read_frame(&mut stream).await.unwrap();
        assert_eq!(event, ClientEvent::StartGame);
        write_frame(&mut stream, &ServerEvent::GameStarted(Slot::One))
            .await
            .unwrap();
    });

    let mut transport = TcpTransport::connect(addr).await.unwrap();
    transport.send(ClientEvent::StartGame).await.unwrap();
    let reply = transport.recv().await.unwrap();
    assert_eq!(reply, ServerEvent::GameStarted(Slot::One));

    server.await.unwrap();
}
