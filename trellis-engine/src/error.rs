use thiserror::Error;
use trellis_core::PeerId;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("webrtc error: {0}")]
    Rtc(#[from] webrtc::Error),

    #[error("no outgoing {kind} sender negotiated")]
    NoSender { kind: &'static str },

    #[error("transport for {0} is closed")]
    Closed(PeerId),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("capture source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation channel closed")]
    ChannelClosed,

    #[error("malformed synthesized audio: {0}")]
    BadAudio(String),

    #[error("{0}")]
    Other(String),
}
