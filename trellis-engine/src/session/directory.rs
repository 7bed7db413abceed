use crate::engine::EngineEvent;
use crate::session::peer_session::{OfferDisposition, PeerSession};
use crate::signaling::SignalingClient;
use crate::transport::{MediaTrack, TrackKind, TransportEvent, TransportFactory};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trellis_core::{CandidateInit, MeetingId, Participant, PeerId};

/// Authoritative owner of every peer session: exactly one per remote
/// participant, never one for self. All calls come from the engine
/// loop, so create/destroy for the same peer can never race itself.
pub struct SessionDirectory {
    self_id: PeerId,
    self_display_name: String,
    meeting: MeetingId,
    sessions: HashMap<PeerId, PeerSession>,
    /// Peers we already initiated an offer towards; cleared only on
    /// session destruction. Makes roster re-deliveries idempotent.
    offered: HashSet<PeerId>,
    /// Identity metadata from the relay, cached for display only.
    roster: HashMap<PeerId, Participant>,
    transports: Arc<dyn TransportFactory>,
    signaling: Arc<dyn SignalingClient>,
    transport_tx: mpsc::Sender<TransportEvent>,
    events_tx: mpsc::Sender<EngineEvent>,
}

impl SessionDirectory {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        self_id: PeerId,
        self_display_name: String,
        meeting: MeetingId,
        transports: Arc<dyn TransportFactory>,
        signaling: Arc<dyn SignalingClient>,
        transport_tx: mpsc::Sender<TransportEvent>,
        events_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            self_id,
            self_display_name,
            meeting,
            sessions: HashMap::new(),
            offered: HashSet::new(),
            roster: HashMap::new(),
            transports,
            signaling,
            transport_tx,
            events_tx,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn participant(&self, peer: &PeerId) -> Option<&Participant> {
        self.roster.get(peer)
    }

    /// Roster snapshot after joining: offer to every participant we
    /// have not offered to yet. Re-delivery is a no-op.
    pub async fn on_roster_snapshot(
        &mut self,
        participants: Vec<Participant>,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) {
        for participant in participants {
            if participant.id == self.self_id {
                continue;
            }
            let peer = participant.id.clone();
            let newcomer = self.roster.insert(peer.clone(), participant.clone()).is_none();
            if newcomer {
                let _ = self
                    .events_tx
                    .send(EngineEvent::ParticipantJoined(participant))
                    .await;
            }
            if self.offered.contains(&peer) || self.sessions.contains_key(&peer) {
                debug!("already negotiating with {peer}, skipping offer");
                continue;
            }
            if let Err(e) = self.ensure_session(&peer, tracks.clone()).await {
                warn!("failed to create session for {peer}: {e}");
                continue;
            }
            self.offered.insert(peer.clone());
            if let Some(session) = self.sessions.get_mut(&peer) {
                if let Err(e) = session.send_offer().await {
                    warn!("failed to offer to {peer}: {e}");
                }
            }
            self.notify_state(&peer).await;
        }
    }

    pub async fn upsert_participant(&mut self, participant: Participant) {
        let newcomer = self
            .roster
            .insert(participant.id.clone(), participant.clone())
            .is_none();
        if newcomer {
            let _ = self
                .events_tx
                .send(EngineEvent::ParticipantJoined(participant))
                .await;
        }
    }

    pub async fn on_remote_offer(
        &mut self,
        from: PeerId,
        from_display_name: String,
        sdp: String,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) {
        if from == self.self_id {
            return;
        }
        self.upsert_participant(Participant::new(from.clone(), from_display_name))
            .await;
        if let Err(e) = self.ensure_session(&from, tracks.clone()).await {
            warn!("failed to create session for offer from {from}: {e}");
            return;
        }
        if let Some(session) = self.sessions.get_mut(&from) {
            match session.apply_remote_offer(sdp.clone()).await {
                Ok(OfferDisposition::Handled) => {}
                Ok(OfferDisposition::YieldToRemote) => {
                    // A connection with an outstanding local offer cannot
                    // take a remote one, so the glare loser starts over on
                    // a fresh connection and answers from there.
                    info!("glare with {from}: replacing connection to take the crossed offer");
                    session.close().await;
                    match self
                        .transports
                        .connect(from.clone(), self.transport_tx.clone(), tracks)
                        .await
                    {
                        Ok(transport) => {
                            session.reset_transport(transport);
                            if let Err(e) = session.apply_remote_offer(sdp).await {
                                warn!("failed to apply crossed offer from {from}: {e}");
                            }
                        }
                        Err(e) => warn!("failed to replace connection for {from}: {e}"),
                    }
                }
                Err(e) => warn!("failed to apply offer from {from}: {e}"),
            }
        }
        self.notify_state(&from).await;
    }

    pub async fn on_remote_answer(&mut self, from: PeerId, sdp: String) {
        let Some(session) = self.sessions.get_mut(&from) else {
            warn!("answer from unknown peer {from}, dropping");
            return;
        };
        if let Err(e) = session.apply_remote_answer(sdp).await {
            warn!("failed to apply answer from {from}: {e}");
        }
        self.notify_state(&from).await;
    }

    pub async fn on_remote_candidate(&mut self, from: PeerId, candidate: CandidateInit) {
        let Some(session) = self.sessions.get_mut(&from) else {
            debug!("candidate from unknown peer {from}, dropping");
            return;
        };
        session.add_remote_candidate(candidate).await;
    }

    /// Destroy a session and every piece of per-peer state. Idempotent;
    /// returns whether a session actually existed.
    pub async fn destroy(&mut self, peer: &PeerId) -> bool {
        self.offered.remove(peer);
        self.roster.remove(peer);
        match self.sessions.remove(peer) {
            Some(session) => {
                info!("destroying session for {peer}");
                session.close().await;
                true
            }
            None => false,
        }
    }

    pub async fn destroy_all(&mut self) {
        let peers: Vec<PeerId> = self.sessions.keys().cloned().collect();
        for peer in peers {
            self.destroy(&peer).await;
        }
    }

    /// In-place outgoing-track replacement across every live session.
    /// Negotiation state is untouched by construction.
    pub async fn bind_track_all(&self, kind: TrackKind, track: Option<MediaTrack>) {
        for session in self.sessions.values() {
            if let Err(e) = session.bind_track(kind, track.clone()).await {
                warn!(
                    "failed to bind {} track for {}: {e}",
                    kind.as_str(),
                    session.peer_id()
                );
            }
        }
    }

    async fn ensure_session(
        &mut self,
        peer: &PeerId,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) -> Result<(), crate::error::TransportError> {
        if self.sessions.contains_key(peer) {
            return Ok(());
        }
        let transport = self
            .transports
            .connect(peer.clone(), self.transport_tx.clone(), tracks)
            .await?;
        let session = PeerSession::new(
            peer.clone(),
            self.self_id.clone(),
            self.self_display_name.clone(),
            self.meeting.clone(),
            transport,
            self.signaling.clone(),
        );
        self.sessions.insert(peer.clone(), session);
        Ok(())
    }

    async fn notify_state(&self, peer: &PeerId) {
        if let Some(session) = self.sessions.get(peer) {
            let _ = self
                .events_tx
                .send(EngineEvent::Negotiation(peer.clone(), session.state()))
                .await;
        }
    }
}
