use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a call participant. Ordered so that tie-breaking policies
/// can compare two identifiers deterministically.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(Uuid::parse_str(s).unwrap())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(Uuid::parse_str(&s).unwrap())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster entry as reported by the signaling relay. Identity is
/// authoritative from the relay; the display name is cached locally
/// only for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: PeerId,
    pub display_name: String,
}

impl Participant {
    pub fn new(id: PeerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
