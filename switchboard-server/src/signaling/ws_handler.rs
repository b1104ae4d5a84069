use crate::AppState;
use crate::signaling::SignalingOutput;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use switchboard_core::{ConnectionId, ProtocolError, ServerEvent, decode_client_event};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_peer(connection_id.clone(), tx);
    state
        .signaling
        .send(
            &connection_id,
            ServerEvent::Welcome {
                connection_id: connection_id.clone(),
                ice_servers: state.signaling.get_ice_servers(),
            },
        )
        .await;

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let connection_id = connection_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match decode_client_event(text.as_str()) {
                        Ok(event) => {
                            debug!("Received {} from {}", event.name(), connection_id);
                            if let Err(e) =
                                state.router.dispatch(connection_id.clone(), event).await
                            {
                                error!("Router died: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid signaling frame from {}: {}", connection_id, e)
                        }
                    },
                    Message::Binary(_) => {
                        warn!(
                            "Ignoring frame from {}: {}",
                            connection_id,
                            ProtocolError::BinaryFrame
                        )
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // The connection is gone from the transport before the router announces it.
    state.signaling.remove_peer(&connection_id);
    if let Err(e) = state.router.disconnect(connection_id.clone()).await {
        error!("Failed to report disconnect of {}: {}", connection_id, e);
    }

    info!("WebSocket disconnected: {}", connection_id);
}
