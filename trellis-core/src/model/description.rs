use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Hash of the raw SDP text. Duplicate and stale-retransmission guards
/// compare these instead of retaining full descriptions.
pub fn sdp_hash(sdp: &str) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    sdp.hash(&mut hasher);
    hasher.finish()
}
