use std::collections::{BTreeSet, HashMap};
use switchboard_core::{ConnectionId, Participant, RoomId};

/// Result of admitting a connection into a room.
#[derive(Debug)]
pub struct Admission<'a> {
    pub participant: &'a Participant,
    /// `false` when the participant was already a member of the room.
    pub newly_joined: bool,
}

/// Table of connected participants and the rooms they are in.
///
/// The participant records are the single source of truth for membership;
/// `rooms` is an index over them so that room fan-out never scans everyone.
#[derive(Debug, Default)]
pub struct Registry {
    participants: HashMap<ConnectionId, Participant>,
    rooms: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the participant on first sight, otherwise adds `room` to its
    /// memberships. Re-joining is a no-op and the original display name is kept.
    pub fn upsert_membership(
        &mut self,
        connection_id: &ConnectionId,
        display_name: &str,
        room: &RoomId,
    ) -> Admission<'_> {
        let participant = self
            .participants
            .entry(connection_id.clone())
            .or_insert_with(|| Participant::new(connection_id.clone(), display_name));

        let newly_joined = participant.rooms.insert(room.clone());
        if newly_joined {
            self.rooms
                .entry(room.clone())
                .or_default()
                .insert(connection_id.clone());
        }

        Admission {
            participant,
            newly_joined,
        }
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants.get(connection_id)
    }

    /// Drops a single membership. Returns `false` if there was nothing to drop.
    pub fn leave(&mut self, connection_id: &ConnectionId, room: &RoomId) -> bool {
        let Some(participant) = self.participants.get_mut(connection_id) else {
            return false;
        };
        if !participant.rooms.remove(room) {
            return false;
        }
        self.unindex(connection_id, room);
        true
    }

    /// Deletes the participant and hands back the rooms it was in.
    /// Unknown ids yield an empty set.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> BTreeSet<RoomId> {
        let Some(participant) = self.participants.remove(connection_id) else {
            return BTreeSet::new();
        };

        for room in &participant.rooms {
            self.unindex(connection_id, room);
        }
        participant.rooms
    }

    pub fn all(&self) -> impl Iterator<Item = &Participant> + Clone + '_ {
        self.participants.values()
    }

    /// Members of `room` in ascending id order.
    pub fn members(&self, room: &RoomId) -> impl Iterator<Item = &ConnectionId> + '_ {
        self.rooms.get(room).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn unindex(&mut self, connection_id: &ConnectionId, room: &RoomId) {
        let Some(members) = self.rooms.get_mut(room) else {
            return;
        };
        members.remove(connection_id);
        if members.is_empty() {
            self.rooms.remove(room);
        }
    }
}
