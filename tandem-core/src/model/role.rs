use serde::{Deserialize, Serialize};

/// Fixed per-room role assigned at join time. Only the initiator ever
/// originates an offer, which rules out glare without any collision
/// resolution protocol.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    pub fn is_initiator(&self) -> bool {
        matches!(self, Role::Initiator)
    }
}
