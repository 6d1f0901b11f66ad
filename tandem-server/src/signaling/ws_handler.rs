use crate::registry::RegistryError;
use crate::relay::RelayService;
use crate::signaling::WsClients;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tandem_core::{PeerId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayService,
    pub clients: Arc<WsClients>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(peer_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Ok(uuid) = Uuid::parse_str(&peer_id) else {
        warn!("rejecting connection with malformed peer id {:?}", peer_id);
        return axum::http::StatusCode::BAD_REQUEST.into_response();
    };
    let peer_id = PeerId(uuid);

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, state))
        .into_response()
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, state: AppState) {
    info!("new signaling connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.clients.add_peer(peer_id.clone(), tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = state.relay.clone();
        let peer_id = peer_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => {
                            if !dispatch(&relay, &peer_id, signal).await {
                                break;
                            }
                        }
                        Err(e) => warn!("invalid signal from {}: {:?}", peer_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            relay.handle_disconnect(&peer_id).await;
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.clients.remove_peer(&peer_id);
    info!("signaling connection closed: {}", peer_id);
}

/// Route one inbound client message. Returns `false` when the connection
/// should be dropped.
async fn dispatch(relay: &RelayService, peer_id: &PeerId, signal: SignalMessage) -> bool {
    match signal {
        SignalMessage::Join { room } => {
            match relay.handle_join(peer_id, room).await {
                Ok(role) => {
                    info!("peer {} joined as {:?}", peer_id, role);
                    true
                }
                Err(RegistryError::RoomFull(room)) => {
                    // No role can be assigned; drop the connection rather
                    // than leave the client in limbo.
                    warn!("room {} is full, rejecting {}", room, peer_id);
                    false
                }
            }
        }
        msg @ (SignalMessage::Offer { .. }
        | SignalMessage::Answer { .. }
        | SignalMessage::Candidate { .. }) => {
            relay.forward(peer_id, msg).await;
            true
        }
        other => {
            warn!("peer {} sent a relay-only message: {:?}", peer_id, other);
            true
        }
    }
}
