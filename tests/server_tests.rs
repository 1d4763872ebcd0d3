//! End-to-end tests driving the server over real TCP connections.

use broadside::protocol::{ClientEvent, ServerEvent};
use broadside::transport::Transport;
use broadside::{server, Coord, ShipType, Slot, TcpTransport};
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};

async fn spawn_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server::run(listener, None).await;
    });
    addr
}

/// Receive events until one matches, failing the test after 5 seconds.
async fn recv_until<F>(transport: &mut TcpTransport, mut matches: F) -> ServerEvent
where
    F: FnMut(&ServerEvent) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            let event = transport.recv().await.unwrap();
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected event never arrived")
}

fn run(row: u8, cols: std::ops::Range<u8>) -> Vec<Coord> {
    cols.map(|col| Coord::new(row, col)).collect()
}

async fn place_fleet(transport: &mut TcpTransport) {
    let ships = [
        (ShipType::Carrier, run(0, 0..5)),
        (ShipType::Battleship, run(1, 0..4)),
        (ShipType::Cruiser, run(2, 0..3)),
        (ShipType::Submarine, run(3, 0..3)),
        (ShipType::Destroyer, run(4, 0..2)),
    ];
    for (ship_type, positions) in ships {
        transport
            .send(ClientEvent::PlaceShip {
                ship_type,
                positions,
            })
            .await
            .unwrap();
        recv_until(transport, |e| matches!(e, ServerEvent::ShipPlaced { .. })).await;
    }
    recv_until(transport, |e| matches!(e, ServerEvent::ReadyToFinish)).await;
}

#[tokio::test]
async fn test_two_clients_play_a_turn() {
    let addr = spawn_server().await;

    let mut p1 = TcpTransport::connect(addr).await.unwrap();
    let assigned = recv_until(&mut p1, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;
    assert_eq!(assigned, ServerEvent::PlayerNumber(Slot::One));

    let mut p2 = TcpTransport::connect(addr).await.unwrap();
    let assigned = recv_until(&mut p2, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;
    assert_eq!(assigned, ServerEvent::PlayerNumber(Slot::Two));

    place_fleet(&mut p1).await;
    place_fleet(&mut p2).await;

    p1.send(ClientEvent::FinishPlacingShips).await.unwrap();
    recv_until(&mut p2, |e| matches!(e, ServerEvent::Player2TurnToPlace)).await;
    p2.send(ClientEvent::FinishPlacingShips).await.unwrap();
    recv_until(&mut p1, |e| matches!(e, ServerEvent::ReadyToStart)).await;
    recv_until(&mut p2, |e| matches!(e, ServerEvent::ReadyToStart)).await;

    p1.send(ClientEvent::StartGame).await.unwrap();
    let started = recv_until(&mut p2, |e| matches!(e, ServerEvent::GameStarted(_))).await;
    assert_eq!(started, ServerEvent::GameStarted(Slot::One));
    recv_until(&mut p1, |e| matches!(e, ServerEvent::YourTurn)).await;

    // player 1 fires at player 2's carrier
    p1.send(ClientEvent::Attack { row: 0, col: 0 }).await.unwrap();
    let result = recv_until(&mut p2, |e| matches!(e, ServerEvent::AttackResult { .. })).await;
    assert_eq!(
        result,
        ServerEvent::AttackResult {
            row: 0,
            col: 0,
            hit: true,
            attacker: Slot::One,
        }
    );
    recv_until(&mut p1, |e| matches!(e, ServerEvent::TurnUpdate(Slot::Two))).await;
    recv_until(&mut p2, |e| matches!(e, ServerEvent::YourTurn)).await;
}

#[tokio::test]
async fn test_third_client_is_rejected_and_disconnected() {
    let addr = spawn_server().await;

    let mut p1 = TcpTransport::connect(addr).await.unwrap();
    recv_until(&mut p1, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;
    let mut p2 = TcpTransport::connect(addr).await.unwrap();
    recv_until(&mut p2, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;

    let mut p3 = TcpTransport::connect(addr).await.unwrap();
    let rejection = recv_until(&mut p3, |e| matches!(e, ServerEvent::GameFull)).await;
    assert_eq!(rejection, ServerEvent::GameFull);
    // the server closes the rejected connection
    assert!(p3.recv().await.is_err());

    // the match is unaffected: both players can still act
    p1.send(ClientEvent::SyncState).await.unwrap();
    recv_until(&mut p1, |e| matches!(e, ServerEvent::GameState(_))).await;
}

#[tokio::test]
async fn test_disconnect_resets_the_match_for_the_survivor() {
    let addr = spawn_server().await;

    let mut p1 = TcpTransport::connect(addr).await.unwrap();
    recv_until(&mut p1, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;
    let mut p2 = TcpTransport::connect(addr).await.unwrap();
    recv_until(&mut p2, |e| matches!(e, ServerEvent::PlayerNumber(_))).await;

    place_fleet(&mut p1).await;
    drop(p2);

    recv_until(&mut p1, |e| matches!(e, ServerEvent::GameReset)).await;

    p1.send(ClientEvent::SyncState).await.unwrap();
    let snapshot = recv_until(&mut p1, |e| matches!(e, ServerEvent::GameState(_))).await;
    let ServerEvent::GameState(view) = snapshot else {
        unreachable!()
    };
    assert!(!view.started);
    assert!(view.placing);
    assert!(view.my_ships.is_empty());
}
