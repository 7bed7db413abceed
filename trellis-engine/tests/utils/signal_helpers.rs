use std::sync::Arc;
use trellis_core::CandidateInit;
use trellis_engine::MediaTrack;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Deterministic low/high peer identifiers for tie-break tests.
pub const LOW_PEER: &str = "00000000-0000-4000-8000-000000000001";
pub const HIGH_PEER: &str = "ffffffff-ffff-4fff-bfff-fffffffffffe";

pub fn candidate(n: u16) -> CandidateInit {
    CandidateInit {
        candidate: format!("candidate:{n} 1 udp 2130706431 192.0.2.{n} 54321 typ host"),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
    }
}

pub fn audio_track(id: &str) -> MediaTrack {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            ..Default::default()
        },
        id.to_owned(),
        "trellis".to_owned(),
    ))
}

pub fn video_track(id: &str) -> MediaTrack {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            ..Default::default()
        },
        id.to_owned(),
        "trellis".to_owned(),
    ))
}
