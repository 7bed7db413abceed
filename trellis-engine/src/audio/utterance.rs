use crate::audio::pcm;
use std::time::Duration;
use trellis_core::AudioFrame;

/// Turn-based chunking parameters. The silence window is measured in
/// sample time, so the state machine is deterministic for a given
/// input regardless of wall-clock scheduling.
#[derive(Debug, Clone)]
pub struct UtteranceConfig {
    pub sample_rate: u32,
    /// Minimum block RMS (float scale) that counts as speech.
    pub speech_threshold: f32,
    /// Silence that must elapse after speech before the buffer flushes.
    pub silence_window: Duration,
}

impl Default for UtteranceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            speech_threshold: 0.01,
            silence_window: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Silent,
    Speaking,
}

/// Utterance-level chunker for the turn-based translation path: buffer
/// everything from the first speech onward, and once the speaker has
/// been quiet for the whole silence window, flush the accumulated
/// buffer as a single PCM16 packet. Speech re-entering before the
/// window elapses cancels the pending flush.
pub struct UtteranceChunker {
    config: UtteranceConfig,
    window_samples: usize,
    state: VoiceState,
    buffer: Vec<f32>,
    silent_samples: usize,
}

impl UtteranceChunker {
    pub fn new(config: UtteranceConfig) -> Self {
        let window_samples =
            (config.sample_rate as u128 * config.silence_window.as_millis() / 1000) as usize;
        Self {
            config,
            window_samples,
            state: VoiceState::Silent,
            buffer: Vec::new(),
            silent_samples: 0,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Feed one block at the configured sample rate; returns a flushed
    /// utterance when the silence window has just elapsed.
    pub fn push(&mut self, block: &[f32]) -> Option<AudioFrame> {
        let energy = pcm::rms(block);

        if self.state == VoiceState::Silent && energy <= self.config.speech_threshold {
            // Leading silence is not an utterance.
            return None;
        }

        self.buffer.extend_from_slice(block);

        if energy > self.config.speech_threshold {
            self.state = VoiceState::Speaking;
            self.silent_samples = 0;
            return None;
        }

        self.silent_samples += block.len();
        if self.silent_samples >= self.window_samples {
            return Some(self.take());
        }
        None
    }

    /// Force the pending buffer out (used on pipeline shutdown).
    pub fn flush(&mut self) -> Option<AudioFrame> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.take())
    }

    fn take(&mut self) -> AudioFrame {
        let samples = self.buffer.iter().map(|&s| pcm::quantize(s)).collect();
        self.buffer.clear();
        self.silent_samples = 0;
        self.state = VoiceState::Silent;
        AudioFrame::new(samples)
    }
}
