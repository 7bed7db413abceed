use crate::audio::pcm;
use std::collections::VecDeque;
use trellis_core::AudioFrame;

/// Streaming framing parameters. Defaults mirror what the translation
/// collaborator expects: 16 kHz, 100 ms frames, and a silence gate on
/// the i16 RMS scale (0 disables the gate).
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub target_sample_rate: u32,
    pub frame_ms: u32,
    pub silence_rms: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            frame_ms: 100,
            silence_rms: 250.0,
        }
    }
}

/// Continuous framing filter for the streaming translation path.
///
/// Raw float blocks of any size and rate go in; fixed-length PCM16
/// frames at the target rate come out, in strict chronological order,
/// with sub-threshold (silent) frames dropped. Never blocks.
pub struct FrameSegmenter {
    config: SegmenterConfig,
    frame_len: usize,
    fifo: VecDeque<i16>,
}

impl FrameSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let frame_len = (config.target_sample_rate * config.frame_ms / 1000) as usize;
        Self {
            config,
            frame_len,
            fifo: VecDeque::new(),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Feed one capture block; returns every complete frame it
    /// produced, which may be none or several.
    pub fn push(&mut self, samples: &[f32], input_rate: u32) -> Vec<AudioFrame> {
        let resampled = pcm::downsample(samples, input_rate, self.config.target_sample_rate);
        self.fifo.extend(resampled.iter().map(|&s| pcm::quantize(s)));

        let mut frames = Vec::new();
        while self.fifo.len() >= self.frame_len {
            let samples: Vec<i16> = self.fifo.drain(..self.frame_len).collect();
            let frame = AudioFrame::new(samples);
            if self.config.silence_rms > 0.0 && frame.rms() < self.config.silence_rms {
                continue;
            }
            frames.push(frame);
        }
        frames
    }
}
