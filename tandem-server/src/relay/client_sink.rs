use async_trait::async_trait;
use tandem_core::{PeerId, SignalMessage};

/// Outbound delivery path from the relay to a connected client.
///
/// The production implementation writes to the peer's WebSocket send
/// queue; tests substitute a capturing mock. Delivery per peer must be
/// FIFO: the negotiation state machine on the far side relies on
/// descriptions arriving before candidates sent after them.
#[async_trait]
pub trait ClientSink: Send + Sync {
    async fn deliver(&self, peer: &PeerId, msg: SignalMessage);
}
