use crate::media::{AudioSource, CaptureEvent, LocalMedia, MediaRouter, VideoSource};
use crate::session::{NegotiationState, SessionDirectory};
use crate::signaling::SignalingClient;
use crate::transport::{TrackKind, TransportEvent, TransportFactory};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trellis_core::{MeetingId, Participant, PeerId, SignalEvent, SignalMessage};

/// Commands accepted by the engine loop. Everything that can touch
/// negotiation or the outgoing media set goes through here, so per-call
/// state is only ever mutated from one task.
#[derive(Debug)]
pub enum EngineCommand {
    /// An event delivered by the signaling relay.
    Signal(SignalEvent),
    SetVideoSource(VideoSource),
    SetAudioSource(AudioSource),
    SetCameraEnabled(bool),
    SetMicrophoneEnabled(bool),
    /// Announce departure and tear every session down.
    Leave,
}

/// Observations the engine surfaces to the shell.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Negotiation(PeerId, NegotiationState),
    ParticipantJoined(Participant),
    ParticipantLeft(PeerId),
    /// Connectivity with the peer failed at the transport level; the
    /// session has already been destroyed.
    PeerUnreachable {
        peer: PeerId,
        display_name: Option<String>,
    },
    RemoteTrack(PeerId, TrackKind),
    SourceUnavailable {
        kind: TrackKind,
        reason: String,
    },
}

/// Cheap clone-able front for the engine loop.
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub async fn signal(&self, event: SignalEvent) {
        let _ = self.command_tx.send(EngineCommand::Signal(event)).await;
    }

    pub async fn set_video_source(&self, source: VideoSource) {
        let _ = self
            .command_tx
            .send(EngineCommand::SetVideoSource(source))
            .await;
    }

    pub async fn set_audio_source(&self, source: AudioSource) {
        let _ = self
            .command_tx
            .send(EngineCommand::SetAudioSource(source))
            .await;
    }

    pub async fn set_camera_enabled(&self, enabled: bool) {
        let _ = self
            .command_tx
            .send(EngineCommand::SetCameraEnabled(enabled))
            .await;
    }

    pub async fn set_microphone_enabled(&self, enabled: bool) {
        let _ = self
            .command_tx
            .send(EngineCommand::SetMicrophoneEnabled(enabled))
            .await;
    }

    pub async fn leave(&self) {
        let _ = self.command_tx.send(EngineCommand::Leave).await;
    }
}

/// The per-call actor. Owns the session directory and the media router;
/// serializes signaling events, shell commands, transport callbacks and
/// capture lifecycle onto a single loop.
pub struct CallEngine {
    self_id: PeerId,
    display_name: String,
    meeting: MeetingId,
    directory: SessionDirectory,
    router: MediaRouter,
    signaling: Arc<dyn SignalingClient>,
    command_rx: mpsc::Receiver<EngineCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    capture_rx: mpsc::Receiver<CaptureEvent>,
    events_tx: mpsc::Sender<EngineEvent>,
}

impl CallEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        self_id: PeerId,
        display_name: String,
        meeting: MeetingId,
        transports: Arc<dyn TransportFactory>,
        signaling: Arc<dyn SignalingClient>,
        local_media: Arc<dyn LocalMedia>,
        capture_rx: mpsc::Receiver<CaptureEvent>,
    ) -> (Self, EngineHandle, mpsc::Receiver<EngineEvent>) {
        let (command_tx, command_rx) = mpsc::channel(100);
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (events_tx, events_rx) = mpsc::channel(256);

        let directory = SessionDirectory::new(
            self_id.clone(),
            display_name.clone(),
            meeting.clone(),
            transports,
            signaling.clone(),
            transport_tx,
            events_tx.clone(),
        );

        let engine = Self {
            self_id,
            display_name,
            meeting,
            directory,
            router: MediaRouter::new(local_media),
            signaling,
            command_rx,
            transport_rx,
            capture_rx,
            events_tx,
        };
        (engine, EngineHandle { command_tx }, events_rx)
    }

    pub async fn run(mut self) {
        info!("call engine started for {}", self.self_id);

        self.signaling
            .send(SignalMessage::Join {
                meeting: self.meeting.clone(),
                peer: self.self_id.clone(),
                display_name: self.display_name.clone(),
            })
            .await;

        let mut capture_open = true;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(EngineCommand::Leave) => {
                            self.leave().await;
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("command channel closed, leaving call");
                            self.leave().await;
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e).await,
                        None => {
                            warn!("transport channel closed unexpectedly");
                            break;
                        }
                    }
                }

                cap = self.capture_rx.recv(), if capture_open => {
                    match cap {
                        Some(CaptureEvent::ScreenCaptureEnded) => {
                            self.router.on_screen_capture_ended(&self.directory).await;
                        }
                        None => capture_open = false,
                    }
                }
            }
        }

        info!("call engine finished for {}", self.self_id);
    }

    async fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Signal(event) => self.handle_signal(event).await,

            EngineCommand::SetVideoSource(source) => {
                if let Err(e) = self.router.set_video_source(source, &self.directory).await {
                    warn!("video source switch failed: {e}");
                    let _ = self
                        .events_tx
                        .send(EngineEvent::SourceUnavailable {
                            kind: TrackKind::Video,
                            reason: e.to_string(),
                        })
                        .await;
                }
            }

            EngineCommand::SetAudioSource(source) => {
                if let Err(e) = self.router.set_audio_source(source, &self.directory).await {
                    warn!("audio source switch failed: {e}");
                    let _ = self
                        .events_tx
                        .send(EngineEvent::SourceUnavailable {
                            kind: TrackKind::Audio,
                            reason: e.to_string(),
                        })
                        .await;
                }
            }

            EngineCommand::SetCameraEnabled(enabled) => self.router.set_camera_enabled(enabled),

            EngineCommand::SetMicrophoneEnabled(enabled) => {
                self.router.set_microphone_enabled(enabled)
            }

            // Handled in the loop so it can break.
            EngineCommand::Leave => {}
        }
    }

    async fn handle_signal(&mut self, event: SignalEvent) {
        match event {
            SignalEvent::RosterSnapshot { participants } => {
                self.directory
                    .on_roster_snapshot(participants, self.router.current_tracks())
                    .await;
            }

            SignalEvent::ParticipantJoined { participant } => {
                // Presence only; the newcomer's offer initiates the
                // session.
                self.directory.upsert_participant(participant).await;
            }

            SignalEvent::ParticipantLeft { peer } => {
                self.directory.destroy(&peer).await;
                let _ = self.events_tx.send(EngineEvent::ParticipantLeft(peer)).await;
            }

            SignalEvent::Offer {
                from,
                from_display_name,
                sdp,
            } => {
                self.directory
                    .on_remote_offer(from, from_display_name, sdp, self.router.current_tracks())
                    .await;
            }

            SignalEvent::Answer { from, sdp } => {
                self.directory.on_remote_answer(from, sdp).await;
            }

            SignalEvent::Candidate { from, candidate } => {
                self.directory.on_remote_candidate(from, candidate).await;
            }
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(peer, candidate) => {
                self.signaling
                    .send(SignalMessage::Candidate {
                        meeting: self.meeting.clone(),
                        to: peer,
                        candidate,
                    })
                    .await;
            }

            TransportEvent::ConnectionFailed(peer) => {
                let display_name = self
                    .directory
                    .participant(&peer)
                    .map(|p| p.display_name.clone());
                // A failure for a session we already tore down is just the
                // old connection winding down, not news.
                if self.directory.destroy(&peer).await {
                    warn!("transport failed for {peer}");
                    let _ = self
                        .events_tx
                        .send(EngineEvent::PeerUnreachable { peer, display_name })
                        .await;
                } else {
                    debug!("transport failure for departed peer {peer}, dropping");
                }
            }

            TransportEvent::RemoteTrack(peer, kind) => {
                let _ = self.events_tx.send(EngineEvent::RemoteTrack(peer, kind)).await;
            }
        }
    }

    async fn leave(&mut self) {
        self.signaling
            .send(SignalMessage::Leave {
                meeting: self.meeting.clone(),
            })
            .await;
        self.directory.destroy_all().await;
    }
}
