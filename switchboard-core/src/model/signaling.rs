use crate::model::candidate::CandidateDescriptor;
use crate::model::peer::{ConnectionId, Participant, PeerInfo};
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// SDP offer or answer. The relay never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDescription(pub Value);

/// Events a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientEvent {
    #[serde(rename = "join-room")]
    JoinRoom {
        room: RoomId,
        #[serde(default)]
        name: String,
    },

    #[serde(rename = "leave-room")]
    LeaveRoom { room: RoomId },

    /// Without a target the offer goes to everyone sharing a room with the sender.
    #[serde(rename = "offer")]
    Offer {
        #[serde(default)]
        target: Option<ConnectionId>,
        description: SessionDescription,
    },

    #[serde(rename = "answer")]
    Answer {
        target: ConnectionId,
        description: SessionDescription,
    },

    #[serde(rename = "candidate")]
    Candidate {
        #[serde(default)]
        target: Option<ConnectionId>,
        candidate: CandidateDescriptor,
    },

    #[serde(rename = "sendMessage")]
    SendMessage { room: RoomId, message: String },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join-room",
            Self::LeaveRoom { .. } => "leave-room",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::Candidate { .. } => "candidate",
            Self::SendMessage { .. } => "sendMessage",
        }
    }
}

/// Events the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEvent {
    /// First frame on every connection.
    #[serde(rename = "welcome", rename_all = "camelCase")]
    Welcome {
        connection_id: ConnectionId,
        ice_servers: Vec<IceServerConfig>,
    },

    /// Join acknowledgement with the other members of the room.
    #[serde(rename = "joined")]
    Joined { room: RoomId, peers: Vec<PeerInfo> },

    #[serde(rename = "user-joined", rename_all = "camelCase")]
    UserJoined {
        connection_id: ConnectionId,
        name: String,
        room: RoomId,
    },

    #[serde(rename = "user-left", rename_all = "camelCase")]
    UserLeft {
        connection_id: ConnectionId,
        room: RoomId,
    },

    #[serde(rename = "roster")]
    Roster { participants: Vec<Participant> },

    #[serde(rename = "offer")]
    Offer {
        from: ConnectionId,
        description: SessionDescription,
    },

    #[serde(rename = "answer")]
    Answer {
        from: ConnectionId,
        description: SessionDescription,
    },

    #[serde(rename = "candidate")]
    Candidate {
        from: ConnectionId,
        candidate: CandidateDescriptor,
    },

    #[serde(rename = "receiveMessage")]
    ReceiveMessage {
        message: String,
        user: String,
        from: ConnectionId,
        room: RoomId,
    },

    #[serde(rename = "user-disconnected", rename_all = "camelCase")]
    UserDisconnected { connection_id: ConnectionId },
}
