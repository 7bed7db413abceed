use std::time::Duration;
use tokio::sync::mpsc;
use trellis_core::TranslateRequest;
use trellis_engine::{AudioBlock, Translator, TranslatorConfig};

use crate::integration::init_tracing;
use crate::utils::MockTranslationChannel;

#[tokio::test]
async fn loud_capture_becomes_fixed_frames_and_silence_is_gated() {
    init_tracing();

    let channel = MockTranslationChannel::new();
    let (blocks_tx, blocks_rx) = mpsc::channel(64);
    let (_events_tx, events_rx) = mpsc::channel(64);
    let (captions_tx, _captions_rx) = mpsc::channel(64);
    let (playback_tx, _playback_rx) = mpsc::channel(64);

    // Default config: streaming, 16 kHz, 100 ms frames.
    let translator = Translator::new(
        TranslatorConfig::default(),
        channel.clone(),
        blocks_rx,
        events_rx,
        captions_tx,
        playback_tx,
    );
    let task = translator.spawn();

    // 100 ms of loud 48 kHz capture: exactly one 1600-sample frame.
    blocks_tx
        .send(AudioBlock {
            samples: vec![0.5; 4800],
            sample_rate: 48_000,
        })
        .await
        .unwrap();

    let mut frames = Vec::new();
    for _ in 0..100 {
        frames = channel.frames().await;
        if !frames.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len(), 1600 * 2, "100 ms of PCM16 at 16 kHz");

    // Pure silence produces no frame at all.
    blocks_tx
        .send(AudioBlock {
            samples: vec![0.0; 4800],
            sample_rate: 48_000,
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(channel.frames().await.len(), 1, "silent frame must be dropped");

    // The stream was opened with the negotiated rate.
    match channel.requests().await.first() {
        Some(TranslateRequest::Start { sample_rate, .. }) => assert_eq!(*sample_rate, 16_000),
        other => panic!("expected Start first, got {other:?}"),
    }

    drop(blocks_tx);
    let _ = task.await;

    // Closing the capture side ends the stream cleanly.
    assert!(
        channel
            .requests()
            .await
            .iter()
            .any(|r| matches!(r, TranslateRequest::EndAudio))
    );
}
