use trellis_core::{PeerId, SignalEvent, SignalMessage};
use trellis_engine::TransportEvent;

use crate::integration::{create_test_call, init_tracing, recv_signal};
use crate::utils::candidate;

#[tokio::test]
async fn locally_gathered_candidates_reach_the_relay() {
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

    let transport = call.transports.transport_for(&bob).expect("transport for bob");
    transport
        .emit(TransportEvent::CandidateGenerated(bob.clone(), candidate(4)))
        .await;

    match recv_signal(&mut call.signal_rx, 1000).await {
        Some(SignalMessage::Candidate { to, candidate: c, .. }) => {
            assert_eq!(to, bob);
            assert_eq!(c, candidate(4));
        }
        other => panic!("expected a candidate message, got {other:?}"),
    }
}
