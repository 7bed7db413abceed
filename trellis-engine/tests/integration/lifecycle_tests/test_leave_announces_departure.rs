use trellis_core::{Participant, PeerId, SignalEvent, SignalMessage};

use crate::integration::{create_test_call, init_tracing, recv_signal};

#[tokio::test]
async fn leaving_announces_and_closes_every_session() {
    init_tracing();

    let mut call = create_test_call(PeerId::new(), "Alice").await;
    let bob = PeerId::new();
    let carol = PeerId::new();

    call.handle
        .signal(SignalEvent::RosterSnapshot {
            participants: vec![
                Participant::new(bob.clone(), "Bob"),
                Participant::new(carol.clone(), "Carol"),
            ],
        })
        .await;
    for _ in 0..2 {
        assert!(
            matches!(
                recv_signal(&mut call.signal_rx, 1000).await,
                Some(SignalMessage::Offer { .. })
            )
        );
    }

    call.handle.leave().await;

    match recv_signal(&mut call.signal_rx, 1000).await {
        Some(SignalMessage::Leave { meeting }) => assert_eq!(meeting, call.meeting),
        other => panic!("expected a leave announcement, got {other:?}"),
    }

    for peer in [&bob, &carol] {
        let transport = call.transports.transport_for(peer).expect("transport exists");
        assert!(transport.closed().await, "session for {peer} must be closed");
    }
}
