use async_trait::async_trait;
use trellis_core::SignalMessage;

/// Outbound half of the signaling relay, implemented by the shell
/// (WebSocket client or similar). Fire-and-forget: delivery is
/// at-most-once and unacknowledged, so the engine never waits on it.
#[async_trait]
pub trait SignalingClient: Send + Sync {
    async fn send(&self, message: SignalMessage);
}
