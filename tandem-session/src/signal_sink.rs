use async_trait::async_trait;
use tandem_core::SignalMessage;

/// Outbound signaling path from a session to the relay.
///
/// Assumed to be an ordered, at-least-once channel; messages are
/// fire-and-forget and loss is not detected here.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, msg: SignalMessage);
}
