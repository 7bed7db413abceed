use crate::audio::wav::decode_wav_pcm16;
use crate::error::TranslateError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use trellis_core::AudioFrame;

/// Decoded synthesized audio ready for the translated-voice output
/// source. The shell schedules it into the playback track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub sample_rate: u32,
    pub frame: AudioFrame,
}

/// Decode a synthesized-audio payload from the translation
/// collaborator: either a complete PCM16 WAV or raw little-endian
/// PCM16 at `default_rate`.
pub fn decode_synthesized(
    payload: &[u8],
    default_rate: u32,
) -> Result<SynthesizedAudio, TranslateError> {
    if payload.starts_with(b"RIFF") {
        let (sample_rate, samples) = decode_wav_pcm16(payload)?;
        return Ok(SynthesizedAudio {
            sample_rate,
            frame: AudioFrame::new(samples),
        });
    }
    Ok(SynthesizedAudio {
        sample_rate: default_rate,
        frame: AudioFrame::from_bytes(payload),
    })
}

/// Base64 variant of [`decode_synthesized`] (the turn-based
/// collaborator ships audio inside a JSON result).
pub fn decode_synthesized_base64(
    payload: &str,
    default_rate: u32,
) -> Result<SynthesizedAudio, TranslateError> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| TranslateError::BadAudio(format!("invalid base64: {e}")))?;
    decode_synthesized(&bytes, default_rate)
}
