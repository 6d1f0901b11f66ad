use crate::relay::ClientSink;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use tandem_core::{PeerId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Registry of connected WebSocket clients, keyed by peer id. Each entry
/// is the sender side of the peer's single ordered send queue, so
/// delivery per peer stays FIFO.
pub struct WsClients {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

impl WsClients {
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
        }
    }

    pub fn add_peer(&self, peer: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(peer, tx);
    }

    pub fn remove_peer(&self, peer: &PeerId) {
        self.peers.remove(peer);
    }
}

impl Default for WsClients {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientSink for WsClients {
    async fn deliver(&self, peer: &PeerId, msg: SignalMessage) {
        let Some(tx) = self.peers.get(peer) else {
            warn!("attempted to deliver a signal to disconnected peer {}", peer);
            return;
        };

        match serde_json::to_string(&msg) {
            Ok(json) => {
                if let Err(e) = tx.send(Message::Text(json.into())) {
                    error!("failed to queue message for {}: {:?}", peer, e);
                }
            }
            Err(e) => error!("failed to serialize signal message: {}", e),
        }
    }
}
