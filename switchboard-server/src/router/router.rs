use crate::config::PresenceMode;
use crate::registry::Registry;
use crate::router::router_command::RouterCommand;
use crate::signaling::SignalingOutput;
use std::collections::BTreeSet;
use std::sync::Arc;
use switchboard_core::{
    CandidateDescriptor, ClientEvent, ConnectionId, Participant, PeerInfo, RoomId,
    ServerEvent, SessionDescription,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the registry and decides where every signaling message goes.
///
/// Commands are handled one at a time, each to completion (registry changes
/// and all of its sends) before the next one starts. Nothing else touches the
/// registry, so it needs no locking.
pub struct Router {
    registry: Registry,
    output: Arc<dyn SignalingOutput>,
    presence: PresenceMode,
}

impl Router {
    pub fn new(output: Arc<dyn SignalingOutput>, presence: PresenceMode) -> Self {
        Self {
            registry: Registry::new(),
            output,
            presence,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn run(mut self, mut command_rx: mpsc::Receiver<RouterCommand>) {
        info!("Router event loop started");

        while let Some(cmd) = command_rx.recv().await {
            self.handle(cmd).await;
        }

        info!("Command channel closed. Router event loop finished");
    }

    pub async fn handle(&mut self, cmd: RouterCommand) {
        match cmd {
            RouterCommand::Signal { from, event } => self.handle_event(from, event).await,

            RouterCommand::Disconnect { connection_id } => {
                self.handle_disconnect(connection_id).await;
            }

            RouterCommand::Lookup {
                connection_id,
                reply,
            } => {
                let _ = reply.send(self.registry.lookup(&connection_id).cloned());
            }
        }
    }

    async fn handle_event(&mut self, from: ConnectionId, event: ClientEvent) {
        debug!("{} from {}", event.name(), from);

        match event {
            ClientEvent::JoinRoom { room, name } => self.handle_join(from, room, name).await,
            ClientEvent::LeaveRoom { room } => self.handle_leave(from, room).await,
            ClientEvent::Offer {
                target,
                description,
            } => self.handle_offer(from, target, description).await,
            ClientEvent::Answer {
                target,
                description,
            } => self.handle_answer(from, target, description).await,
            ClientEvent::Candidate { target, candidate } => {
                self.handle_candidate(from, target, candidate).await
            }
            ClientEvent::SendMessage { room, message } => {
                self.handle_send_message(from, room, message).await
            }
        }
    }

    async fn handle_join(&mut self, from: ConnectionId, room: RoomId, name: String) {
        let admission = self.registry.upsert_membership(&from, &name, &room);
        let newly_joined = admission.newly_joined;
        let joiner = admission.participant.info();

        let peers: Vec<PeerInfo> = self
            .registry
            .members(&room)
            .filter(|id| **id != from)
            .filter_map(|id| self.registry.lookup(id))
            .map(Participant::info)
            .collect();

        self.output
            .send(
                &from,
                ServerEvent::Joined {
                    room: room.clone(),
                    peers,
                },
            )
            .await;

        if !newly_joined {
            debug!("{} is already in room '{}'", from, room);
            return;
        }

        info!("{} joined room '{}' as {:?}", from, room, joiner.name);

        let recipients = self.room_recipients([&room], Some(&from));
        self.output
            .send_many(
                recipients,
                ServerEvent::UserJoined {
                    connection_id: from,
                    name: joiner.name,
                    room,
                },
            )
            .await;

        self.publish_roster().await;
    }

    async fn handle_leave(&mut self, from: ConnectionId, room: RoomId) {
        if !self.registry.leave(&from, &room) {
            debug!("{} is not in room '{}', nothing to leave", from, room);
            return;
        }

        info!("{} left room '{}'", from, room);

        let recipients = self.room_recipients([&room], Some(&from));
        self.output
            .send_many(
                recipients,
                ServerEvent::UserLeft {
                    connection_id: from,
                    room,
                },
            )
            .await;

        self.publish_roster().await;
    }

    async fn handle_offer(
        &self,
        from: ConnectionId,
        target: Option<ConnectionId>,
        description: SessionDescription,
    ) {
        let event = ServerEvent::Offer {
            from: from.clone(),
            description,
        };
        self.route_to_peers(&from, target, event).await;
    }

    async fn handle_answer(
        &self,
        from: ConnectionId,
        target: ConnectionId,
        description: SessionDescription,
    ) {
        let event = ServerEvent::Answer {
            from: from.clone(),
            description,
        };
        self.route_to_peers(&from, Some(target), event).await;
    }

    async fn handle_candidate(
        &self,
        from: ConnectionId,
        target: Option<ConnectionId>,
        candidate: CandidateDescriptor,
    ) {
        if !candidate.is_well_formed() {
            warn!(
                "Dropping malformed ICE candidate from {} (sdpMid: {:?}, sdpMLineIndex: {:?})",
                from, candidate.sdp_mid, candidate.sdp_m_line_index
            );
            return;
        }

        let event = ServerEvent::Candidate {
            from: from.clone(),
            candidate,
        };
        self.route_to_peers(&from, target, event).await;
    }

    async fn handle_send_message(&self, from: ConnectionId, room: RoomId, message: String) {
        let Some(sender) = self.registry.lookup(&from) else {
            debug!("Dropping message from unregistered connection {}", from);
            return;
        };
        if !sender.is_member(&room) {
            debug!("Dropping message from {}: not a member of '{}'", from, room);
            return;
        }

        // The sender is a member, so it gets its own message back.
        let recipients = self.room_recipients([&room], None);
        let event = ServerEvent::ReceiveMessage {
            message,
            user: sender.display_name.clone(),
            from,
            room,
        };
        self.output.send_many(recipients, event).await;
    }

    async fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        let was_registered = self.registry.lookup(&connection_id).is_some();
        let rooms = self.registry.remove(&connection_id);

        if !was_registered {
            debug!("Disconnect for {} which never joined a room", connection_id);
            return;
        }

        info!(
            "{} disconnected, leaving {} room(s)",
            connection_id,
            rooms.len()
        );

        let recipients = self.room_recipients(&rooms, Some(&connection_id));
        self.output
            .send_many(recipients, ServerEvent::UserDisconnected { connection_id })
            .await;

        self.publish_roster().await;
    }

    /// Unicast to a known `target`, or fan out to every room the sender is in
    /// when no target is given.
    async fn route_to_peers(
        &self,
        from: &ConnectionId,
        target: Option<ConnectionId>,
        event: ServerEvent,
    ) {
        let Some(sender) = self.registry.lookup(from) else {
            debug!("Dropping signal from unregistered connection {}", from);
            return;
        };

        match target {
            Some(target) if &target == from => {
                debug!("Dropping signal addressed by {} to itself", from);
            }
            Some(target) => {
                if self.registry.lookup(&target).is_none() {
                    debug!("Dropping signal from {} to unknown target {}", from, target);
                    return;
                }
                self.output.send(&target, event).await;
            }
            None => {
                let recipients = self.room_recipients(&sender.rooms, Some(from));
                self.output.send_many(recipients, event).await;
            }
        }
    }

    /// Members of all given rooms, each at most once.
    fn room_recipients<'r>(
        &self,
        rooms: impl IntoIterator<Item = &'r RoomId>,
        exclude: Option<&ConnectionId>,
    ) -> BTreeSet<ConnectionId> {
        rooms
            .into_iter()
            .flat_map(|room| self.registry.members(room))
            .filter(|id| Some(*id) != exclude)
            .cloned()
            .collect()
    }

    /// Roster mode only: every registered participant gets the full roster.
    /// Connections that never joined are not told who is here.
    async fn publish_roster(&self) {
        if self.presence != PresenceMode::Roster {
            return;
        }

        let mut participants: Vec<Participant> = self.registry.all().cloned().collect();
        participants.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));
        let recipients = participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect();

        self.output
            .send_many(recipients, ServerEvent::Roster { participants })
            .await;
    }
}
