pub mod candidate_tests;
pub mod lifecycle_tests;
pub mod media_tests;
pub mod negotiation_tests;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Level;
use trellis_core::{MeetingId, PeerId, SignalMessage};
use trellis_engine::{CallEngine, EngineEvent, EngineHandle, StaticLocalMedia};

use crate::utils::{MockSignalingClient, MockTransportFactory};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One engine wired to mocks, running on its own task.
pub struct TestCall {
    pub self_id: PeerId,
    pub meeting: MeetingId,
    pub handle: EngineHandle,
    pub events: mpsc::Receiver<EngineEvent>,
    pub signal_rx: mpsc::UnboundedReceiver<SignalMessage>,
    pub signaling: Arc<MockSignalingClient>,
    pub transports: Arc<MockTransportFactory>,
    pub media: Arc<StaticLocalMedia>,
}

/// Spawns an engine and consumes its Join announcement so tests start
/// from a clean signaling stream.
pub async fn create_test_call(self_id: PeerId, display_name: &str) -> TestCall {
    let meeting = MeetingId::new();
    let (signaling, mut signal_rx) = MockSignalingClient::new();
    let transports = MockTransportFactory::new();
    let (media, capture_rx) = StaticLocalMedia::new();

    let (engine, handle, events) = CallEngine::new(
        self_id.clone(),
        display_name.to_owned(),
        meeting.clone(),
        transports.clone(),
        signaling.clone(),
        media.clone(),
        capture_rx,
    );
    tokio::spawn(engine.run());

    let join = recv_signal(&mut signal_rx, 1000).await;
    assert!(
        matches!(join, Some(SignalMessage::Join { .. })),
        "engine should announce itself first, got {join:?}"
    );

    TestCall {
        self_id,
        meeting,
        handle,
        events,
        signal_rx,
        signaling,
        transports,
        media,
    }
}

pub async fn recv_signal(
    rx: &mut mpsc::UnboundedReceiver<SignalMessage>,
    ms: u64,
) -> Option<SignalMessage> {
    tokio::time::timeout(Duration::from_millis(ms), rx.recv())
        .await
        .ok()
        .flatten()
}

pub async fn recv_event(rx: &mut mpsc::Receiver<EngineEvent>, ms: u64) -> Option<EngineEvent> {
    tokio::time::timeout(Duration::from_millis(ms), rx.recv())
        .await
        .ok()
        .flatten()
}

/// Discard events until one matches, or time out.
pub async fn wait_for_event(
    rx: &mut mpsc::Receiver<EngineEvent>,
    ms: u64,
    pred: impl Fn(&EngineEvent) -> bool,
) -> Option<EngineEvent> {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(ms);
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match tokio::time::timeout(remaining, rx.recv()).await {
            Ok(Some(event)) if pred(&event) => return Some(event),
            Ok(Some(_)) => continue,
            _ => return None,
        }
    }
}
