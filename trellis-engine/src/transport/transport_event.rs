use crate::transport::TrackKind;
use trellis_core::{CandidateInit, PeerId};

/// Events a peer transport pushes back into the engine loop.
#[derive(Debug)]
pub enum TransportEvent {
    /// Trickle ICE: a local candidate is ready for the remote peer.
    CandidateGenerated(PeerId, CandidateInit),
    /// The connection reached failed/disconnected/closed. Locally
    /// derived; triggers session destruction.
    ConnectionFailed(PeerId),
    /// A remote media track started arriving.
    RemoteTrack(PeerId, TrackKind),
}
