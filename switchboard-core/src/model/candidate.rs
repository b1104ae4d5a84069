use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ICE candidate as produced by a browser (`RTCIceCandidateInit`).
///
/// Only the presence of `sdpMid` and `sdpMLineIndex` is looked at, never their
/// type. Every other field, `candidate` included, is kept verbatim in `extra`
/// and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateDescriptor {
    /// A candidate can only be applied by the remote peer when it names its
    /// media section both ways.
    pub fn is_well_formed(&self) -> bool {
        is_present(&self.sdp_mid) && is_present(&self.sdp_m_line_index)
    }
}

fn is_present(field: &Option<Value>) -> bool {
    field.as_ref().is_some_and(|v| !v.is_null())
}
