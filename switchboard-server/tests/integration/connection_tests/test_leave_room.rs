use switchboard_core::{ClientEvent, ServerEvent};

use crate::integration::{create_test_router, init_tracing};
use crate::utils::{conn, join, room, settle};

#[tokio::test]
async fn test_leave_notifies_remaining_members() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    settle(&router, "b").await.unwrap();
    signaling.clear().await;

    router
        .dispatch(conn("b"), ClientEvent::LeaveRoom { room: room("lobby") })
        .await
        .unwrap();

    let bob = settle(&router, "b").await.unwrap().expect("Bob stays registered");
    assert!(bob.rooms.is_empty());

    assert_eq!(
        signaling.events_for(&conn("a")).await,
        vec![ServerEvent::UserLeft {
            connection_id: conn("b"),
            room: room("lobby"),
        }]
    );
}

#[tokio::test]
async fn test_leave_unknown_room_is_noop() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    settle(&router, "b").await.unwrap();
    signaling.clear().await;

    router
        .dispatch(conn("b"), ClientEvent::LeaveRoom { room: room("games") })
        .await
        .unwrap();
    settle(&router, "b").await.unwrap();

    assert!(signaling.events_for(&conn("a")).await.is_empty());
}

#[tokio::test]
async fn test_left_member_no_longer_receives_room_traffic() {
    init_tracing();

    let (router, _delivery_rx, signaling) = create_test_router();

    join(&router, "a", "lobby", "Alice").await.unwrap();
    join(&router, "b", "lobby", "Bob").await.unwrap();
    router
        .dispatch(conn("b"), ClientEvent::LeaveRoom { room: room("lobby") })
        .await
        .unwrap();
    settle(&router, "b").await.unwrap();
    signaling.clear().await;

    router
        .dispatch(
            conn("a"),
            ClientEvent::SendMessage {
                room: room("lobby"),
                message: "anyone?".to_string(),
            },
        )
        .await
        .unwrap();
    settle(&router, "a").await.unwrap();

    assert!(signaling.events_for(&conn("b")).await.is_empty());
    assert_eq!(signaling.events_for(&conn("a")).await.len(), 1);
}
