use switchboard_core::{ClientEvent, ConnectionId, Participant};
use tokio::sync::oneshot;

/// Commands delivered to the router by the transport.
#[derive(Debug)]
pub enum RouterCommand {
    /// A decoded signaling event from one connection.
    Signal {
        from: ConnectionId,
        event: ClientEvent,
    },

    /// The connection's socket closed. Sent exactly once per connection.
    Disconnect { connection_id: ConnectionId },

    /// Read-only snapshot of a participant.
    Lookup {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Option<Participant>>,
    },
}
