use crate::error::TransportError;
use crate::transport::{
    MediaTrack, PeerTransport, TrackKind, TransportConfig, TransportEvent, TransportFactory,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use trellis_core::{CandidateInit, PeerId};

/// Production transport: one `RTCPeerConnection` per peer session.
pub struct RtcTransport {
    peer_id: PeerId,
    peer_connection: Arc<RTCPeerConnection>,
    senders: Mutex<HashMap<TrackKind, Arc<webrtc::rtp_transceiver::rtp_sender::RTCRtpSender>>>,
    closing: Arc<AtomicBool>,
}

impl RtcTransport {
    /// Build the connection, wire its callbacks into `event_tx`, and
    /// attach the current outgoing tracks.
    pub async fn new(
        peer_id: PeerId,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) -> Result<Self, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let closing = Arc::new(AtomicBool::new(false));

        // Connection state: failed/disconnected/closed all surface the
        // same way and let the directory destroy the session. A close we
        // initiated ourselves is not a failure and stays quiet.
        let state_tx = event_tx.clone();
        let state_peer = peer_id.clone();
        let state_closing = closing.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = state_peer.clone();
                let closing = state_closing.clone();
                Box::pin(async move {
                    info!("connection state for {peer}: {s}");
                    if closing.load(Ordering::Acquire) {
                        return;
                    }
                    match s {
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            let _ = tx.send(TransportEvent::ConnectionFailed(peer)).await;
                        }
                        _ => {}
                    }
                })
            },
        ));

        // Trickle ICE: hand local candidates to the engine for signaling.
        let ice_tx = event_tx.clone();
        let ice_peer = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = CandidateInit {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(peer, candidate))
                    .await;
            })
        }));

        let track_tx = event_tx.clone();
        let track_peer = peer_id.clone();
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let peer = track_peer.clone();
            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => TrackKind::Audio,
                    _ => TrackKind::Video,
                };
                debug!("remote {} track from {peer}", kind.as_str());
                let _ = tx.send(TransportEvent::RemoteTrack(peer, kind)).await;
            })
        }));

        let mut senders = HashMap::new();
        for (kind, track) in tracks {
            let sender = peer_connection.add_track(track).await?;
            senders.insert(kind, sender);
        }

        Ok(Self {
            peer_id,
            peer_connection,
            senders: Mutex::new(senders),
            closing,
        })
    }
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(answer.sdp)
    }

    async fn set_local_answer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_offer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_candidate(&self, candidate: CandidateInit) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            ..Default::default()
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn replace_track(
        &self,
        kind: TrackKind,
        track: Option<MediaTrack>,
    ) -> Result<(), TransportError> {
        let mut senders = self.senders.lock().await;
        match senders.get(&kind) {
            Some(sender) => {
                sender.replace_track(track).await?;
                Ok(())
            }
            None => match track {
                Some(track) => {
                    // No media line of this kind was negotiated yet; the
                    // new sender takes effect on the next negotiation.
                    warn!(
                        "no outgoing {} sender for {}, adding track",
                        kind.as_str(),
                        self.peer_id
                    );
                    let sender = self.peer_connection.add_track(track).await?;
                    senders.insert(kind, sender);
                    Ok(())
                }
                None => Err(TransportError::NoSender {
                    kind: kind.as_str(),
                }),
            },
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closing.store(true, Ordering::Release);
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Default factory: one `RtcTransport` per session, all sharing the
/// engine's transport event channel.
pub struct RtcTransportFactory {
    config: TransportConfig,
}

impl RtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn connect(
        &self,
        peer_id: PeerId,
        event_tx: mpsc::Sender<TransportEvent>,
        tracks: Vec<(TrackKind, MediaTrack)>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let transport = RtcTransport::new(peer_id, self.config.clone(), event_tx, tracks).await?;
        Ok(Arc::new(transport))
    }
}
