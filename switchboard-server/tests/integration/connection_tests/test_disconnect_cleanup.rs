use switchboard_core::{ClientEvent, ServerEvent};

use crate::integration::{create_test_router, init_tracing};
use crate::utils::{conn, join, offer_sdp, room, settle};

#[tokio::test]
async fn test_disconnect_removes_participant_and_notifies_room() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    settle(&router, "b").await.unwrap();
    signaling.clear().await;

    router.disconnect(conn("b")).await.unwrap();

    assert!(
        settle(&router, "b").await.unwrap().is_none(),
        "Bob's record is gone once his disconnect is handled"
    );
    assert_eq!(
        signaling.events_for(&conn("a")).await,
        vec![ServerEvent::UserDisconnected {
            connection_id: conn("b"),
        }]
    );
    assert!(signaling.events_for(&conn("b")).await.is_empty());
}

#[tokio::test]
async fn test_disconnect_notifies_each_peer_once() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "a", "games", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    join(&router, "b", "games", "Bob").await.unwrap();
    join(&router, "c", "games", "Carol").await.unwrap();
    settle(&router, "c").await.unwrap();
    signaling.clear().await;

    router.disconnect(conn("a")).await.unwrap();
    settle(&router, "a").await.unwrap();

    for peer in ["b", "c"] {
        assert_eq!(
            signaling.events_for(&conn(peer)).await,
            vec![ServerEvent::UserDisconnected {
                connection_id: conn("a"),
            }],
            "{peer} should get exactly one notice"
        );
    }
}

#[tokio::test]
async fn test_events_after_disconnect_are_ignored() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    router.disconnect(conn("b")).await.unwrap();
    settle(&router, "b").await.unwrap();
    signaling.clear().await;

    router
        .dispatch(
            conn("b"),
            ClientEvent::SendMessage {
                room: room("lobby"),
                message: "still here?".to_string(),
            },
        )
        .await
        .unwrap();
    router
        .dispatch(
            conn("b"),
            ClientEvent::Offer {
                target: Some(conn("a")),
                description: offer_sdp(),
            },
        )
        .await
        .unwrap();
    router
        .dispatch(
            conn("a"),
            ClientEvent::Offer {
                target: Some(conn("b")),
                description: offer_sdp(),
            },
        )
        .await
        .unwrap();
    router.disconnect(conn("b")).await.unwrap();
    settle(&router, "a").await.unwrap();

    assert!(signaling.events_for(&conn("a")).await.is_empty());
    assert!(signaling.events_for(&conn("b")).await.is_empty());
}

#[tokio::test]
async fn test_disconnect_without_join_is_silent() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    settle(&router, "a").await.unwrap();
    signaling.clear().await;

    router.disconnect(conn("never-joined")).await.unwrap();
    settle(&router, "a").await.unwrap();

    assert!(signaling.events_for(&conn("a")).await.is_empty());
}
