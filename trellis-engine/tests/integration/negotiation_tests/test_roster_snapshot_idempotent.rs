use trellis_core::{Participant, PeerId, SignalEvent, SignalMessage};
use trellis_engine::{EngineEvent, NegotiationState};

use crate::integration::{create_test_call, init_tracing, recv_signal, wait_for_event};
use crate::utils::TransportOp;

#[tokio::test]
async fn roster_snapshot_offers_once_per_peer() {
    init_tracing();

    let mut call = create_test_call(PeerId::new(), "Alice").await;
    let bob = PeerId::new();
    let snapshot = SignalEvent::RosterSnapshot {
        participants: vec![Participant::new(bob.clone(), "Bob")],
    };

    call.handle.signal(snapshot.clone()).await;

    let sent = recv_signal(&mut call.signal_rx, 1000).await;
    match sent {
        Some(SignalMessage::Offer { to, .. }) => assert_eq!(to, bob),
        other => panic!("expected an offer to bob, got {other:?}"),
    }

    let joined = wait_for_event(&mut call.events, 1000, |e| {
        matches!(e, EngineEvent::ParticipantJoined(p) if p.id == bob)
    })
    .await;
    assert!(joined.is_some(), "bob should be reported as joined");

    let negotiating = wait_for_event(&mut call.events, 1000, |e| {
        matches!(
            e,
            EngineEvent::Negotiation(peer, NegotiationState::HaveLocalOffer) if *peer == bob
        )
    })
    .await;
    assert!(negotiating.is_some(), "offer should leave a local offer outstanding");

    // The relay may re-deliver the snapshot; that must not re-offer.
    call.handle.signal(snapshot).await;
    assert!(
        recv_signal(&mut call.signal_rx, 200).await.is_none(),
        "re-delivered snapshot must not produce another offer"
    );

    let transport = call.transports.transport_for(&bob).expect("one transport for bob");
    assert_eq!(transport.count(&TransportOp::CreateOffer).await, 1);
    assert_eq!(call.transports.transport_count(), 1);
}

#[tokio::test]
async fn roster_snapshot_skips_self() {
    init_tracing();

    let self_id = PeerId::new();
    let mut call = create_test_call(self_id.clone(), "Alice").await;

    call.handle
        .signal(SignalEvent::RosterSnapshot {
            participants: vec![Participant::new(self_id.clone(), "Alice")],
        })
        .await;

    assert!(
        recv_signal(&mut call.signal_rx, 200).await.is_none(),
        "never offer to ourselves"
    );
    assert_eq!(call.transports.transport_count(), 0);
}
