mod audio;
mod description;
mod meeting;
mod participant;
mod signaling;
mod translation;

pub use audio::AudioFrame;
pub use description::{SdpKind, sdp_hash};
pub use meeting::MeetingId;
pub use participant::{Participant, PeerId};
pub use signaling::{CandidateInit, IceServerConfig, SignalEvent, SignalMessage};
pub use translation::{TranslateEvent, TranslateRequest};
