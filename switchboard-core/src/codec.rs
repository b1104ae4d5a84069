//! JSON framing for the signaling socket.
//!
//! Every frame is a text message of the form `{"type": "<event>", "payload": {...}}`.

use crate::model::{ClientEvent, ServerEvent};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary frames are not part of the signaling protocol")]
    BinaryFrame,
}

pub fn decode_client_event(text: &str) -> Result<ClientEvent, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode_server_event(event: &ServerEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}
