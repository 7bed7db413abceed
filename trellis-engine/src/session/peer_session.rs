use crate::error::TransportError;
use crate::session::candidate_queue::CandidateQueue;
use crate::session::glare::{self, GlareOutcome};
use crate::session::negotiation::{NegotiationAction, NegotiationState, transition};
use crate::signaling::SignalingClient;
use crate::transport::{MediaTrack, PeerTransport, TrackKind};
use std::sync::Arc;
use tracing::{debug, info, warn};
use trellis_core::{CandidateInit, MeetingId, PeerId, SdpKind, SignalMessage, model::sdp_hash};

/// How an incoming offer was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDisposition {
    /// Answered, or deliberately discarded (stale, glare winner).
    Handled,
    /// Glare loser: the outstanding local offer must go. The connection
    /// itself cannot take the remote offer in this state, so the owner
    /// replaces the transport and re-applies the offer.
    YieldToRemote,
}

/// One per remote participant, never per call. Owns its connection
/// resource exclusively; all operations run on the engine loop, so a
/// session never sees two negotiation steps interleave.
pub struct PeerSession {
    peer_id: PeerId,
    self_id: PeerId,
    self_display_name: String,
    meeting: MeetingId,
    transport: Arc<dyn PeerTransport>,
    signaling: Arc<dyn SignalingClient>,
    state: NegotiationState,
    pending_candidates: CandidateQueue,
    remote_description_set: bool,
    last_local_sdp: Option<u64>,
    last_remote_sdp: Option<u64>,
}

impl PeerSession {
    pub fn new(
        peer_id: PeerId,
        self_id: PeerId,
        self_display_name: String,
        meeting: MeetingId,
        transport: Arc<dyn PeerTransport>,
        signaling: Arc<dyn SignalingClient>,
    ) -> Self {
        Self {
            peer_id,
            self_id,
            self_display_name,
            meeting,
            transport,
            signaling,
            state: NegotiationState::Idle,
            pending_candidates: CandidateQueue::new(),
            remote_description_set: false,
            last_local_sdp: None,
            last_remote_sdp: None,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Initiate negotiation. Valid from `Idle`/`Stable` only; anything
    /// else is a no-op.
    pub async fn send_offer(&mut self) -> Result<(), TransportError> {
        let Some(next) = transition(self.state, NegotiationAction::SendOffer) else {
            debug!(
                "not offering to {} in state {:?}",
                self.peer_id, self.state
            );
            return Ok(());
        };

        let sdp = self.transport.create_offer().await?;
        self.last_local_sdp = Some(sdp_hash(&sdp));
        self.state = next;

        self.signaling
            .send(SignalMessage::Offer {
                meeting: self.meeting.clone(),
                to: self.peer_id.clone(),
                sdp,
                kind: SdpKind::Offer,
                from_display_name: self.self_display_name.clone(),
            })
            .await;
        Ok(())
    }

    /// Apply an incoming offer, resolving glare if our own offer is
    /// still outstanding, then answer it.
    pub async fn apply_remote_offer(
        &mut self,
        sdp: String,
    ) -> Result<OfferDisposition, TransportError> {
        let hash = sdp_hash(&sdp);
        if self.last_remote_sdp == Some(hash) {
            debug!("stale offer retransmission from {}, ignoring", self.peer_id);
            return Ok(OfferDisposition::Handled);
        }

        if self.state == NegotiationState::HaveLocalOffer {
            match glare::resolve(&self.self_id, &self.peer_id) {
                GlareOutcome::KeepLocalOffer => {
                    info!(
                        "glare with {}: keeping local offer, peer yields",
                        self.peer_id
                    );
                    return Ok(OfferDisposition::Handled);
                }
                GlareOutcome::YieldToRemote => {
                    info!("glare with {}: yielding local offer", self.peer_id);
                    return Ok(OfferDisposition::YieldToRemote);
                }
            }
        }

        let Some(next) = transition(self.state, NegotiationAction::ReceiveOffer) else {
            warn!(
                "cannot apply offer from {} in state {:?}, ignoring",
                self.peer_id, self.state
            );
            return Ok(OfferDisposition::Handled);
        };

        self.transport.set_remote_offer(sdp).await?;
        self.last_remote_sdp = Some(hash);
        self.remote_description_set = true;
        self.state = next;
        self.drain_candidates().await;

        self.send_answer().await?;
        Ok(OfferDisposition::Handled)
    }

    /// Swap in a fresh connection after yielding to a crossed offer.
    /// The outstanding local offer dies with the old transport; queued
    /// remote candidates survive, they belong to the peer's offer.
    pub fn reset_transport(&mut self, transport: Arc<dyn PeerTransport>) {
        self.transport = transport;
        self.state = transition(self.state, NegotiationAction::Rollback)
            .unwrap_or(NegotiationState::Idle);
        self.remote_description_set = false;
        self.last_local_sdp = None;
    }

    async fn send_answer(&mut self) -> Result<(), TransportError> {
        let sdp = self.transport.create_answer().await?;
        let hash = sdp_hash(&sdp);
        if self.last_local_sdp == Some(hash) {
            debug!("duplicate answer to {} suppressed", self.peer_id);
            return Ok(());
        }

        self.transport.set_local_answer(sdp.clone()).await?;
        if let Some(next) = transition(self.state, NegotiationAction::SendAnswer) {
            self.state = next;
        }
        self.last_local_sdp = Some(hash);

        self.signaling
            .send(SignalMessage::Answer {
                meeting: self.meeting.clone(),
                to: self.peer_id.clone(),
                sdp,
                kind: SdpKind::Answer,
            })
            .await;
        Ok(())
    }

    /// Apply an incoming answer. Anything arriving without a matching
    /// outstanding local offer is a race artifact, not an error.
    pub async fn apply_remote_answer(&mut self, sdp: String) -> Result<(), TransportError> {
        if self.state != NegotiationState::HaveLocalOffer {
            warn!(
                "discarding answer from {} in state {:?}",
                self.peer_id, self.state
            );
            return Ok(());
        }

        let hash = sdp_hash(&sdp);
        if self.last_remote_sdp == Some(hash) {
            debug!(
                "stale answer retransmission from {}, ignoring",
                self.peer_id
            );
            return Ok(());
        }

        self.transport.set_remote_answer(sdp).await?;
        self.last_remote_sdp = Some(hash);
        self.remote_description_set = true;
        if let Some(next) = transition(self.state, NegotiationAction::ReceiveAnswer) {
            self.state = next;
        }
        self.drain_candidates().await;
        Ok(())
    }

    /// Queue the candidate until a remote description exists, apply it
    /// immediately afterwards.
    pub async fn add_remote_candidate(&mut self, candidate: CandidateInit) {
        if !self.remote_description_set {
            self.pending_candidates.push(candidate);
            return;
        }
        if let Err(e) = self.transport.add_candidate(candidate).await {
            warn!("failed to add candidate for {}: {e}", self.peer_id);
        }
    }

    async fn drain_candidates(&mut self) {
        let queued = self.pending_candidates.drain();
        if queued.is_empty() {
            return;
        }
        debug!(
            "applying {} queued candidates for {}",
            queued.len(),
            self.peer_id
        );
        for candidate in queued {
            if let Err(e) = self.transport.add_candidate(candidate).await {
                warn!("failed to apply queued candidate for {}: {e}", self.peer_id);
            }
        }
    }

    /// Swap the outgoing track of one kind in place. Negotiation state
    /// is untouched.
    pub async fn bind_track(
        &self,
        kind: TrackKind,
        track: Option<MediaTrack>,
    ) -> Result<(), TransportError> {
        self.transport.replace_track(kind, track).await
    }

    pub async fn close(&self) {
        if let Err(e) = self.transport.close().await {
            warn!("error closing transport for {}: {e}", self.peer_id);
        }
    }
}
