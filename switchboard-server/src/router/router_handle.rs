use crate::config::PresenceMode;
use crate::error::RelayError;
use crate::router::{Router, RouterCommand};
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use switchboard_core::{ClientEvent, ConnectionId, Participant};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

const COMMAND_QUEUE_SIZE: usize = 256;

/// Cheap, cloneable entry point into the router task.
#[derive(Clone)]
pub struct RouterHandle {
    command_tx: mpsc::Sender<RouterCommand>,
}

impl RouterHandle {
    /// Starts a router on the current tokio runtime.
    pub fn spawn(output: Arc<dyn SignalingOutput>, presence: PresenceMode) -> Self {
        info!("Starting signaling router ({:?} presence)", presence);

        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let router = Router::new(output, presence);
        tokio::spawn(router.run(command_rx));

        Self { command_tx }
    }

    pub async fn dispatch(&self, from: ConnectionId, event: ClientEvent) -> Result<(), RelayError> {
        self.command(RouterCommand::Signal { from, event }).await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.command(RouterCommand::Disconnect { connection_id }).await
    }

    /// Answered after every command queued before it, so a reply also means
    /// those commands have been fully handled.
    pub async fn lookup(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Option<Participant>, RelayError> {
        let (reply, reply_rx) = oneshot::channel();
        self.command(RouterCommand::Lookup {
            connection_id,
            reply,
        })
        .await?;

        reply_rx.await.map_err(|_| RelayError::RouterClosed)
    }

    async fn command(&self, cmd: RouterCommand) -> Result<(), RelayError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::RouterClosed)
    }
}
