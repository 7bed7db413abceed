use crate::audio::{
    FrameSegmenter, SegmenterConfig, SynthesizedAudio, UtteranceChunker, UtteranceConfig,
    decode_synthesized, decode_synthesized_base64, downsample,
};
use crate::translate::TranslationChannel;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use trellis_core::{TranslateEvent, TranslateRequest};

/// How microphone audio is segmented for the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// Fixed-duration frames, continuous stream.
    Streaming,
    /// Whole utterances bounded by silence, one request per turn.
    TurnBased,
}

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub mode: TranslationMode,
    pub from_lang: String,
    pub to_lang: String,
    pub segmenter: SegmenterConfig,
    pub utterance: UtteranceConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            mode: TranslationMode::Streaming,
            from_lang: "es-ES".into(),
            to_lang: "en-US".into(),
            segmenter: SegmenterConfig::default(),
            utterance: UtteranceConfig::default(),
        }
    }
}

/// One raw capture block from the microphone, at whatever rate the
/// platform delivers.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Captions produced by the translation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionUpdate {
    Partial(String),
    Final {
        original: Option<String>,
        translated: String,
    },
}

enum Segmentation {
    Streaming(FrameSegmenter),
    TurnBased(UtteranceChunker),
}

/// Drives the audio segmentation pipeline: capture blocks in, framed
/// PCM out to the translation channel, collaborator events back out as
/// captions and playback audio. Runs independently of call sessions.
pub struct Translator {
    config: TranslatorConfig,
    channel: Arc<dyn TranslationChannel>,
    segmentation: Segmentation,
    blocks_rx: mpsc::Receiver<AudioBlock>,
    events_rx: mpsc::Receiver<TranslateEvent>,
    captions_tx: mpsc::Sender<CaptionUpdate>,
    playback_tx: mpsc::Sender<SynthesizedAudio>,
}

impl Translator {
    pub fn new(
        config: TranslatorConfig,
        channel: Arc<dyn TranslationChannel>,
        blocks_rx: mpsc::Receiver<AudioBlock>,
        events_rx: mpsc::Receiver<TranslateEvent>,
        captions_tx: mpsc::Sender<CaptionUpdate>,
        playback_tx: mpsc::Sender<SynthesizedAudio>,
    ) -> Self {
        let segmentation = match config.mode {
            TranslationMode::Streaming => {
                Segmentation::Streaming(FrameSegmenter::new(config.segmenter.clone()))
            }
            TranslationMode::TurnBased => {
                Segmentation::TurnBased(UtteranceChunker::new(config.utterance.clone()))
            }
        };
        Self {
            config,
            channel,
            segmentation,
            blocks_rx,
            events_rx,
            captions_tx,
            playback_tx,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        info!("translation pipeline started ({:?})", self.config.mode);

        let start = TranslateRequest::Start {
            from: self.config.from_lang.clone(),
            to: self.config.to_lang.clone(),
            sample_rate: self.target_rate(),
        };
        if let Err(e) = self.channel.send(start).await {
            error!("failed to start translation channel: {e}");
        }

        loop {
            tokio::select! {
                block = self.blocks_rx.recv() => {
                    match block {
                        Some(block) => self.handle_block(block).await,
                        None => break,
                    }
                }
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            warn!("translation event channel closed");
                            break;
                        }
                    }
                }
            }
        }

        self.shutdown().await;
        info!("translation pipeline finished");
    }

    fn target_rate(&self) -> u32 {
        match self.config.mode {
            TranslationMode::Streaming => self.config.segmenter.target_sample_rate,
            TranslationMode::TurnBased => self.config.utterance.sample_rate,
        }
    }

    async fn handle_block(&mut self, block: AudioBlock) {
        match &mut self.segmentation {
            Segmentation::Streaming(segmenter) => {
                for frame in segmenter.push(&block.samples, block.sample_rate) {
                    let request = TranslateRequest::Frame(frame.into_bytes().to_vec());
                    if let Err(e) = self.channel.send(request).await {
                        // Frames are simply not acknowledged; keep going.
                        error!("translation channel error: {e}");
                    }
                }
            }
            Segmentation::TurnBased(chunker) => {
                let target = self.config.utterance.sample_rate;
                let resampled = downsample(&block.samples, block.sample_rate, target);
                if let Some(packet) = chunker.push(&resampled) {
                    Self::send_utterance(&self.channel, packet).await;
                }
            }
        }
    }

    async fn send_utterance(channel: &Arc<dyn TranslationChannel>, packet: trellis_core::AudioFrame) {
        debug!("flushing utterance of {} samples", packet.len());
        if let Err(e) = channel
            .send(TranslateRequest::Frame(packet.into_bytes().to_vec()))
            .await
        {
            error!("translation channel error: {e}");
            return;
        }
        if let Err(e) = channel.send(TranslateRequest::Stop).await {
            error!("translation channel error: {e}");
        }
    }

    async fn handle_event(&mut self, event: TranslateEvent) {
        match event {
            TranslateEvent::Ready => debug!("translation collaborator ready"),
            TranslateEvent::PartialText { text } => {
                let _ = self.captions_tx.send(CaptionUpdate::Partial(text)).await;
            }
            TranslateEvent::FinalText { text } => {
                let _ = self
                    .captions_tx
                    .send(CaptionUpdate::Final {
                        original: None,
                        translated: text,
                    })
                    .await;
            }
            TranslateEvent::SynthesizedAudio(bytes) => {
                match decode_synthesized(&bytes, self.target_rate()) {
                    Ok(audio) => {
                        let _ = self.playback_tx.send(audio).await;
                    }
                    Err(e) => warn!("dropping undecodable synthesized audio: {e}"),
                }
            }
            TranslateEvent::UtteranceResult {
                original,
                translated,
                audio_base64,
            } => {
                let _ = self
                    .captions_tx
                    .send(CaptionUpdate::Final {
                        original: Some(original),
                        translated,
                    })
                    .await;
                if let Some(b64) = audio_base64 {
                    match decode_synthesized_base64(&b64, self.target_rate()) {
                        Ok(audio) => {
                            let _ = self.playback_tx.send(audio).await;
                        }
                        Err(e) => warn!("dropping undecodable synthesized audio: {e}"),
                    }
                }
            }
            TranslateEvent::Error { message } => {
                // Collaborator trouble never stops the pipeline.
                error!("translation collaborator error: {message}");
            }
        }
    }

    async fn shutdown(&mut self) {
        if let Segmentation::TurnBased(chunker) = &mut self.segmentation {
            if let Some(packet) = chunker.flush() {
                Self::send_utterance(&self.channel, packet).await;
            }
        }
        if let Err(e) = self.channel.send(TranslateRequest::EndAudio).await {
            debug!("end-audio not delivered: {e}");
        }
    }
}
