use crate::model::description::SdpKind;
use crate::model::meeting::MeetingId;
use crate::model::participant::{Participant, PeerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Connectivity candidate as carried on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

/// Messages the engine sends to the signaling relay. Fire-and-forget,
/// at-most-once delivery, no acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    Join {
        meeting: MeetingId,
        peer: PeerId,
        display_name: String,
    },
    Offer {
        meeting: MeetingId,
        to: PeerId,
        sdp: String,
        kind: SdpKind,
        from_display_name: String,
    },
    Answer {
        meeting: MeetingId,
        to: PeerId,
        sdp: String,
        kind: SdpKind,
    },
    Candidate {
        meeting: MeetingId,
        to: PeerId,
        candidate: CandidateInit,
    },
    Leave {
        meeting: MeetingId,
    },
}

/// Events the relay delivers to the engine. Unordered; duplicates and
/// races are the engine's problem, not the relay's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalEvent {
    RosterSnapshot {
        participants: Vec<Participant>,
    },
    ParticipantJoined {
        participant: Participant,
    },
    ParticipantLeft {
        peer: PeerId,
    },
    Offer {
        from: PeerId,
        from_display_name: String,
        sdp: String,
    },
    Answer {
        from: PeerId,
        sdp: String,
    },
    Candidate {
        from: PeerId,
        candidate: CandidateInit,
    },
}
