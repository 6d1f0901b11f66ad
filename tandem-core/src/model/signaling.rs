use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// A connectivity candidate as carried on the wire. Opaque to the relay;
/// only the media transport interprets the fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
}

/// The signaling wire protocol, one message per event.
///
/// `Offer`/`Answer`/`Candidate` are tagged with the room so the relay can
/// reject messages whose scope does not match the sender's membership.
/// The payloads themselves are never inspected by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    Join {
        room: RoomId,
    },
    Role {
        initiator: bool,
    },
    PeerJoined,
    PeerLeft,
    Offer {
        room: RoomId,
        sdp: String,
    },
    Answer {
        room: RoomId,
        sdp: String,
    },
    Candidate {
        room: RoomId,
        candidate: CandidateInit,
    },
}

impl SignalMessage {
    /// Room tag of a room-scoped message, if this variant carries one.
    pub fn room(&self) -> Option<&RoomId> {
        match self {
            SignalMessage::Join { room }
            | SignalMessage::Offer { room, .. }
            | SignalMessage::Answer { room, .. }
            | SignalMessage::Candidate { room, .. } => Some(room),
            _ => None,
        }
    }
}
