use serde::{Deserialize, Serialize};

/// Requests the engine sends down the translation channel.
///
/// `Frame` carries raw little-endian 16-bit PCM at the sample rate
/// announced in `Start`. The turn-based collaborator expects one
/// `Frame` followed by `Stop` per utterance; the streaming collaborator
/// consumes a continuous sequence of frames terminated by `EndAudio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum TranslateRequest {
    Start {
        from: String,
        to: String,
        sample_rate: u32,
    },
    Frame(#[serde(with = "serde_bytes")] Vec<u8>),
    Stop,
    EndAudio,
}

/// Events the translation collaborator emits back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum TranslateEvent {
    Ready,
    PartialText {
        text: String,
    },
    FinalText {
        text: String,
    },
    /// Synthesized audio for a streaming result: raw PCM16 or a
    /// complete WAV, at the collaborator's discretion.
    SynthesizedAudio(#[serde(with = "serde_bytes")] Vec<u8>),
    /// One-shot utterance result from the turn-based collaborator.
    UtteranceResult {
        original: String,
        translated: String,
        audio_base64: Option<String>,
    },
    Error {
        message: String,
    },
}
