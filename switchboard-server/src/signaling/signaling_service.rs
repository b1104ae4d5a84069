use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use switchboard_core::{ConnectionId, IceServerConfig, ServerEvent, encode_server_event};
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Live WebSocket connections, addressable by connection id.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                ice_servers,
            }),
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_peer(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(connection_id, tx);
    }

    pub fn remove_peer(&self, connection_id: &ConnectionId) {
        self.inner.peers.remove(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.inner.peers.len()
    }

    fn encode(event: &ServerEvent) -> Option<Message> {
        match encode_server_event(event) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                error!("Failed to serialize signal message: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, to: &ConnectionId, event: ServerEvent) {
        let Some(peer) = self.inner.peers.get(to) else {
            warn!("Attempted to send signal to disconnected connection {}", to);
            return;
        };
        let Some(msg) = Self::encode(&event) else {
            return;
        };

        // Unbounded send never blocks, so it is fine under the map's read lock.
        if let Err(e) = peer.send(msg) {
            error!("Failed to send WS message to {}: {:?}", to, e);
        }
    }
}
