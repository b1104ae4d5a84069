pub mod codec;
pub mod model;

pub use codec::{ProtocolError, decode_client_event, encode_server_event};
pub use model::*;
