use std::time::Duration;
use trellis_core::{PeerId, SignalEvent, SignalMessage};
use trellis_engine::{TrackKind, VideoSource};

use crate::integration::{create_test_call, init_tracing, recv_signal};
use crate::utils::video_track;

#[tokio::test]
async fn os_level_capture_end_reverts_to_previous_source() {
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

    call.media.register_video(VideoSource::Camera, video_track("cam"));
    call.media.register_video(VideoSource::Screen, video_track("screen"));

    call.handle.set_video_source(VideoSource::Camera).await;
    call.handle.set_video_source(VideoSource::Screen).await;

    // The capture cannot end before the share is actually live: wait
    // for both switches to land on the transport first.
    let transport = call.transports.transport_for(&bob).expect("transport for bob");
    let mut replaced = Vec::new();
    for _ in 0..100 {
        replaced = transport.replaced_tracks().await;
        if replaced.len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(replaced.len(), 2, "camera and screen switches must land first");

    // The user hits the browser/OS "stop sharing" button.
    call.media.end_screen_capture();

    for _ in 0..100 {
        replaced = transport.replaced_tracks().await;
        if replaced.len() >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Camera, then screen, then back to camera; every step in place.
    assert_eq!(
        replaced,
        vec![
            (TrackKind::Video, true),
            (TrackKind::Video, true),
            (TrackKind::Video, true),
        ]
    );
    assert!(
        recv_signal(&mut call.signal_rx, 200).await.is_none(),
        "the revert must not renegotiate"
    );
}
