mod candidate;
mod peer;
mod room;
mod signaling;

pub use candidate::CandidateDescriptor;
pub use peer::{ConnectionId, Participant, PeerInfo};
pub use room::RoomId;
pub use signaling::{ClientEvent, IceServerConfig, ServerEvent, SessionDescription};
