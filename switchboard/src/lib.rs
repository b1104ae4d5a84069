pub use switchboard_core::model::{ConnectionId, RoomId};

pub mod model {
    pub use switchboard_core::model::*;
    pub use switchboard_core::{ProtocolError, decode_client_event, encode_server_event};
}

#[cfg(feature = "server")]
pub mod server {
    pub use switchboard_server::*;
}
