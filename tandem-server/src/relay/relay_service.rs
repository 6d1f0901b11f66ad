use crate::registry::{JoinOutcome, RegistryError, RoomRegistry};
use crate::relay::ClientSink;
use std::sync::Arc;
use tandem_core::{PeerId, Role, RoomId, SignalMessage};
use tracing::{debug, warn};

/// Routes signaling messages between the two members of a room.
///
/// The relay treats `sdp`/`candidate` payloads as opaque; the only
/// validation it performs is that the sender is a current member of the
/// room a message is tagged with.
#[derive(Clone)]
pub struct RelayService {
    registry: Arc<RoomRegistry>,
    sink: Arc<dyn ClientSink>,
}

impl RelayService {
    pub fn new(registry: Arc<RoomRegistry>, sink: Arc<dyn ClientSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Process a `Join`. The joiner always receives its `Role`; when it is
    /// the second member, the first member is told a peer joined.
    pub async fn handle_join(
        &self,
        peer: &PeerId,
        room: RoomId,
    ) -> Result<Role, RegistryError> {
        let outcome = self.registry.join(peer.clone(), room)?;
        let role = outcome.role();

        self.sink
            .deliver(
                peer,
                SignalMessage::Role {
                    initiator: role.is_initiator(),
                },
            )
            .await;

        if let JoinOutcome::Second { other, .. } = outcome {
            self.sink.deliver(&other, SignalMessage::PeerJoined).await;
        }

        Ok(role)
    }

    /// Forward an `Offer`/`Answer`/`Candidate` to the other member of the
    /// room it is tagged with. Messages whose scope does not match the
    /// sender's membership are dropped.
    pub async fn forward(&self, sender: &PeerId, msg: SignalMessage) {
        let Some(room) = msg.room() else {
            warn!("peer {} sent an unroutable message: {:?}", sender, msg);
            return;
        };

        if !self.registry.is_member(sender, room) {
            warn!(
                "peer {} is not a member of room {}, dropping {:?}",
                sender, room, msg
            );
            return;
        }

        let Some(other) = self.registry.peer_of(sender) else {
            debug!(
                "no second member in room {} yet, dropping message from {}",
                room, sender
            );
            return;
        };

        self.sink.deliver(&other, msg).await;
    }

    /// Surface a transport-level disconnect: remove the peer from its room
    /// and tell the remaining member, whose session treats this as an
    /// immediate close trigger.
    pub async fn handle_disconnect(&self, peer: &PeerId) {
        let Some((room, remaining)) = self.registry.leave(peer) else {
            return;
        };

        if let Some(other) = remaining {
            debug!(
                "notifying {} that its peer left room {}",
                other, room
            );
            self.sink.deliver(&other, SignalMessage::PeerLeft).await;
        }
    }
}
