use crate::error::TransportError;
use crate::transport::TransportEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use trellis_core::{CandidateInit, PeerId};
use webrtc::track::track_local::TrackLocal;

/// An outgoing local media track, shared between the capture layer and
/// the transports it is bound to.
pub type MediaTrack = Arc<dyn TrackLocal + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

/// The connection resource owned by exactly one peer session.
///
/// Description operations must be called from a single sequential
/// context per transport; the engine loop guarantees that. Candidate
/// ordering is the caller's responsibility (see `CandidateQueue`).
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Create a local offer and install it as the local description.
    async fn create_offer(&self) -> Result<String, TransportError>;

    /// Create a local answer without installing it; pair with
    /// `set_local_answer` once the duplicate-send guard has passed.
    async fn create_answer(&self) -> Result<String, TransportError>;

    async fn set_local_answer(&self, sdp: String) -> Result<(), TransportError>;

    async fn set_remote_offer(&self, sdp: String) -> Result<(), TransportError>;

    async fn set_remote_answer(&self, sdp: String) -> Result<(), TransportError>;

    async fn add_candidate(&self, candidate: CandidateInit) -> Result<(), TransportError>;

    /// Replace the outgoing track of one kind in place. Never triggers
    /// renegotiation; `None` detaches the sender's track.
    async fn replace_track(
        &self,
        kind: TrackKind,
        track: Option<MediaTrack>,
    ) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Builds one transport per peer session. The engine hands every
/// transport the same event sender so all connections report into the
/// single engine loop.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn connect(
        &self,
        peer_id: PeerId,
        event_tx: mpsc::Sender<TransportEvent>,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError>;
}
