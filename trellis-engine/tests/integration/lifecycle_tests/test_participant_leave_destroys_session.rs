use std::time::Duration;
use trellis_core::{PeerId, SignalEvent, SignalMessage};
use trellis_engine::EngineEvent;

use crate::integration::{create_test_call, init_tracing, recv_signal, wait_for_event};
use crate::utils::candidate;

#[tokio::test]
async fn departed_peer_session_is_torn_down() {
    init_tracing();

    let mut call = create_test_call(PeerId::new(), "Alice").await;
    let bob = PeerId::new();

    call.handle
        .signal(SignalEvent::Offer {
            from: bob.clone(),
            from_display_name: "Bob".into(),
            sdp: "v=0 offer".into(),
        })
        .await;
    assert!(
        matches!(
            recv_signal(&mut call.signal_rx, 1000).await,
            Some(SignalMessage::Answer { .. })
        )
    );

    call.handle
        .signal(SignalEvent::ParticipantLeft { peer: bob.clone() })
        .await;

    let left = wait_for_event(&mut call.events, 1000, |e| {
        matches!(e, EngineEvent::ParticipantLeft(peer) if *peer == bob)
    })
    .await;
    assert!(left.is_some());

    let transport = call.transports.transport_for(&bob).expect("transport for bob");
    assert!(transport.closed().await, "the transport must be closed");

    // Straggler signaling for the departed peer is dropped.
    let before = transport.applied_candidates().await.len();
    call.handle
        .signal(SignalEvent::Candidate {
            from: bob.clone(),
            candidate: candidate(1),
        })
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(transport.applied_candidates().await.len(), before);

    // Re-delivery of the leave is harmless.
    call.handle
        .signal(SignalEvent::ParticipantLeft { peer: bob.clone() })
        .await;
    let left_again = wait_for_event(&mut call.events, 1000, |e| {
        matches!(e, EngineEvent::ParticipantLeft(peer) if *peer == bob)
    })
    .await;
    assert!(left_again.is_some(), "leave is reported, teardown stays idempotent");
}
