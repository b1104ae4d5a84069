use async_trait::async_trait;
use std::collections::BTreeSet;
use switchboard_core::{ConnectionId, ServerEvent};

/// Outbound side of the transport, as seen by the router.
///
/// Sends are fire-and-forget: nothing is acknowledged and a connection that
/// is already gone is skipped.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Send an event to a single connection.
    async fn send(&self, to: &ConnectionId, event: ServerEvent);

    /// Send one copy of an event to each recipient.
    async fn send_many(&self, recipients: BTreeSet<ConnectionId>, event: ServerEvent) {
        for to in &recipients {
            self.send(to, event.clone()).await;
        }
    }
}
