use crate::error::MediaError;
use crate::media::source::{AudioSource, VideoSource};
use crate::transport::MediaTrack;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// Externally triggered capture lifecycle events, observed by the
/// engine loop (never polled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The screen capture ended underneath us (OS-level stop).
    ScreenCaptureEnded,
}

/// Acquisition seam for local capture resources. Implemented by the
/// shell, which owns the actual devices.
///
/// Acquisition failure is recoverable: the router keeps the previous
/// source. Enable toggles gate sample production on the existing track
/// instead of detaching it, so no renegotiation ever happens for a
/// mute.
#[async_trait]
pub trait LocalMedia: Send + Sync {
    /// `Ok(None)` means the source is deliberately trackless
    /// (`VideoSource::None`).
    async fn acquire_video(&self, source: VideoSource) -> Result<Option<MediaTrack>, MediaError>;

    /// `Ok(None)` for `AudioSource::Muted`.
    async fn acquire_audio(&self, source: AudioSource) -> Result<Option<MediaTrack>, MediaError>;

    fn set_video_enabled(&self, enabled: bool);

    fn set_audio_enabled(&self, enabled: bool);
}

/// Default `LocalMedia`: the shell registers one pre-built track per
/// source (`TrackLocalStaticSample` in practice) and writes samples
/// into them, consulting the enabled flags. Screen-capture end is
/// reported explicitly by whoever owns the capture.
pub struct StaticLocalMedia {
    video: DashMap<VideoSource, MediaTrack>,
    audio: DashMap<AudioSource, MediaTrack>,
    video_enabled: AtomicBool,
    audio_enabled: AtomicBool,
    capture_tx: mpsc::Sender<CaptureEvent>,
}

impl StaticLocalMedia {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<CaptureEvent>) {
        let (capture_tx, capture_rx) = mpsc::channel(16);
        let media = Arc::new(Self {
            video: DashMap::new(),
            audio: DashMap::new(),
            video_enabled: AtomicBool::new(true),
            audio_enabled: AtomicBool::new(true),
            capture_tx,
        });
        (media, capture_rx)
    }

    pub fn register_video(&self, source: VideoSource, track: MediaTrack) {
        self.video.insert(source, track);
    }

    pub fn register_audio(&self, source: AudioSource, track: MediaTrack) {
        self.audio.insert(source, track);
    }

    /// Sample writers check these before producing media.
    pub fn video_enabled(&self) -> bool {
        self.video_enabled.load(Ordering::Relaxed)
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::Relaxed)
    }

    /// Called by the capture owner when the OS stops the screen share.
    pub fn end_screen_capture(&self) {
        let _ = self.capture_tx.try_send(CaptureEvent::ScreenCaptureEnded);
    }
}

#[async_trait]
impl LocalMedia for StaticLocalMedia {
    async fn acquire_video(&self, source: VideoSource) -> Result<Option<MediaTrack>, MediaError> {
        if source == VideoSource::None {
            return Ok(None);
        }
        match self.video.get(&source) {
            Some(track) => Ok(Some(track.clone())),
            None => Err(MediaError::SourceUnavailable {
                reason: format!("no {source:?} video track registered"),
            }),
        }
    }

    async fn acquire_audio(&self, source: AudioSource) -> Result<Option<MediaTrack>, MediaError> {
        if source == AudioSource::Muted {
            return Ok(None);
        }
        match self.audio.get(&source) {
            Some(track) => Ok(Some(track.clone())),
            None => Err(MediaError::SourceUnavailable {
                reason: format!("no {source:?} audio track registered"),
            }),
        }
    }

    fn set_video_enabled(&self, enabled: bool) {
        debug!("video capture enabled: {enabled}");
        self.video_enabled.store(enabled, Ordering::Relaxed);
    }

    fn set_audio_enabled(&self, enabled: bool) {
        debug!("audio capture enabled: {enabled}");
        self.audio_enabled.store(enabled, Ordering::Relaxed);
    }
}
