use crate::error::MediaError;
use crate::media::local_media::LocalMedia;
use crate::media::source::{AudioSource, VideoSource};
use crate::session::SessionDirectory;
use crate::transport::{MediaTrack, TrackKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Decouples "which local media is active" from "what every session is
/// sending". All mutation of the outgoing media set funnels through the
/// two source setters; changes fan out as in-place track replacement on
/// every live session, never as renegotiation.
pub struct MediaRouter {
    local: Arc<dyn LocalMedia>,
    video: VideoSource,
    audio: AudioSource,
    /// Where to revert when a screen capture ends underneath us.
    previous_video: VideoSource,
    video_track: Option<MediaTrack>,
    audio_track: Option<MediaTrack>,
}

impl MediaRouter {
    pub fn new(local: Arc<dyn LocalMedia>) -> Self {
        Self {
            local,
            video: VideoSource::None,
            audio: AudioSource::Muted,
            previous_video: VideoSource::None,
            video_track: None,
            audio_track: None,
        }
    }

    pub fn video_source(&self) -> VideoSource {
        self.video
    }

    pub fn audio_source(&self) -> AudioSource {
        self.audio
    }

    /// Outgoing bindings attached to newly created sessions.
    pub fn current_tracks(&self) -> Vec<(TrackKind, MediaTrack)> {
        let mut tracks = Vec::new();
        if let Some(track) = &self.video_track {
            tracks.push((TrackKind::Video, track.clone()));
        }
        if let Some(track) = &self.audio_track {
            tracks.push((TrackKind::Audio, track.clone()));
        }
        tracks
    }

    /// Switch the outgoing video. Acquisition failure leaves the
    /// previous source active.
    pub async fn set_video_source(
        &mut self,
        source: VideoSource,
        directory: &SessionDirectory,
    ) -> Result<(), MediaError> {
        if source == self.video {
            return Ok(());
        }
        let track = self.local.acquire_video(source).await?;
        if source == VideoSource::Screen {
            self.previous_video = self.video;
        }
        info!("video source {:?} -> {:?}", self.video, source);
        self.video = source;
        self.video_track = track.clone();
        directory.bind_track_all(TrackKind::Video, track).await;
        Ok(())
    }

    /// Switch the outgoing audio (microphone, translated voice, muted).
    pub async fn set_audio_source(
        &mut self,
        source: AudioSource,
        directory: &SessionDirectory,
    ) -> Result<(), MediaError> {
        if source == self.audio {
            return Ok(());
        }
        let track = self.local.acquire_audio(source).await?;
        info!("audio source {:?} -> {:?}", self.audio, source);
        self.audio = source;
        self.audio_track = track.clone();
        directory.bind_track_all(TrackKind::Audio, track).await;
        Ok(())
    }

    /// Mute toggles disable the existing track rather than removing it,
    /// preserving the negotiated media line.
    pub fn set_camera_enabled(&self, enabled: bool) {
        self.local.set_video_enabled(enabled);
    }

    pub fn set_microphone_enabled(&self, enabled: bool) {
        self.local.set_audio_enabled(enabled);
    }

    /// Screen capture ended at the OS level: revert to whatever video
    /// was active before the share started.
    pub async fn on_screen_capture_ended(&mut self, directory: &SessionDirectory) {
        if self.video != VideoSource::Screen {
            return;
        }
        let revert_to = self.previous_video;
        info!("screen capture ended, reverting to {revert_to:?}");
        if let Err(e) = self.set_video_source(revert_to, directory).await {
            warn!("failed to revert video source: {e}");
        }
    }
}
