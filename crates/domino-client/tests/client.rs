//! Clients and mirrors against a real server.

use std::time::Duration;

use domino::prelude::*;
use domino_client::{ClientError, ClientMirror, DominoClient};
use domino_protocol::WireTile;

async fn start_server(builder: DominoServerBuilder) -> String {
    let server = builder
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");
    let addr = server.local_addr().expect("local addr").to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// A: [1,2] [3,5]   B: [4,6] [2,4]   C: [1,6] [5,5]   opener [2,6].
async fn start_stacked_server() -> String {
    start_server(
        DominoServer::builder()
            .game_config(GameConfig {
                capacity: 3,
                hand_size: 2,
            })
            .deck(Deck::stacked(
                &[&[(1, 2), (3, 5)], &[(4, 6), (2, 4)], &[(1, 6), (5, 5)]],
                &[(2, 6)],
            )),
    )
    .await
}

struct Seat {
    client: DominoClient,
    mirror: ClientMirror,
}

async fn seat(addr: &str, name: &str) -> Seat {
    let client = DominoClient::connect(addr).await.expect("connect");
    let (me, others) = client.join(name).await.expect("join");
    Seat {
        client,
        mirror: ClientMirror::new(me, others),
    }
}

/// Applies updates until `done` holds for the mirror.
async fn pump_until(seat: &mut Seat, done: impl Fn(&ClientMirror) -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !done(&seat.mirror) {
            let update = seat
                .client
                .next_update()
                .await
                .expect("recv")
                .expect("connection open");
            seat.mirror.apply(update).expect("mirror in sync");
        }
    })
    .await
    .expect("mirror should converge in time");
}

#[tokio::test]
async fn test_mirrors_follow_game_start_and_first_move() {
    let addr = start_stacked_server().await;
    let mut seats = Vec::new();
    for name in ["ana", "bo", "cy"] {
        seats.push(seat(&addr, name).await);
    }

    for seat in &mut seats {
        pump_until(seat, |m| m.current_turn().is_some() && !m.hand().is_empty()).await;
        assert_eq!(seat.mirror.chain().open_ends(), Some((2, 6)));
        assert_eq!(seat.mirror.opponents().len(), 2);
    }
    assert!(seats[0].mirror.is_my_turn());
    assert!(seats[0].mirror.presumed_legal(0));
    assert!(!seats[0].mirror.presumed_legal(1));

    seats[0].client.send_move(0).await.unwrap();

    for seat in &mut seats {
        pump_until(seat, |m| m.chain().len() == 2).await;
        assert_eq!(seat.mirror.chain().open_ends(), Some((1, 6)));
        assert_eq!(seat.mirror.current_turn(), Some(PlayerId(2)));
    }
    assert_eq!(
        seats[0].mirror.hand(),
        &[None, Some(WireTile { x: 3, y: 5 })]
    );
    assert_eq!(
        seats[1].mirror.opponents()[0].played,
        vec![(0, WireTile { x: 1, y: 2 })]
    );
}

#[tokio::test]
async fn test_join_full_game_is_rejected_with_code() {
    let addr = start_server(DominoServer::builder().seed(4).game_config(GameConfig {
        capacity: 1,
        hand_size: 3,
    }))
    .await;
    let _first = seat(&addr, "ana").await;

    let client = DominoClient::connect(&addr).await.unwrap();
    let err = client.join("bo").await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { code: 409, .. }));
}

#[tokio::test]
async fn test_join_blank_name_fails_locally() {
    let addr = start_server(DominoServer::builder().seed(4)).await;
    let client = DominoClient::connect(&addr).await.unwrap();
    assert!(matches!(
        client.join("  ").await,
        Err(ClientError::EmptyName)
    ));
}

#[tokio::test]
async fn test_send_move_before_join_is_not_joined() {
    let addr = start_server(DominoServer::builder().seed(4)).await;
    let client = DominoClient::connect(&addr).await.unwrap();
    assert!(matches!(
        client.send_move(0).await,
        Err(ClientError::NotJoined)
    ));
    assert_eq!(client.player_id(), None);
}

#[tokio::test]
async fn test_request_cards_refreshes_hand() {
    let addr = start_server(DominoServer::builder().seed(4)).await;
    let mut ana = seat(&addr, "ana").await;
    pump_until(&mut ana, |m| m.hand().len() == 5).await;

    ana.client.request_cards().await.unwrap();
    let update = tokio::time::timeout(Duration::from_secs(2), ana.client.next_update())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(matches!(
        update,
        domino_protocol::ServerUpdate::Cards { player_id, ref cards }
            if player_id == PlayerId(1) && cards.len() == 5
    ));
}
