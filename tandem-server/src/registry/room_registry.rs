use dashmap::DashMap;
use tandem_core::{PeerId, Role, RoomId};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// A room never holds more than two members; a third joiner is
    /// rejected outright instead of being admitted with no role.
    #[error("room {0} already has two members")]
    RoomFull(RoomId),
}

/// Result of a successful join, telling the relay whom to notify.
#[derive(Debug, PartialEq)]
pub enum JoinOutcome {
    /// First member of a fresh room. Nobody to notify.
    First { role: Role },
    /// Second member. The first member must be told a peer joined.
    Second { role: Role, other: PeerId },
    /// The peer was already a member; its role is unchanged.
    AlreadyMember { role: Role },
}

impl JoinOutcome {
    pub fn role(&self) -> Role {
        match self {
            JoinOutcome::First { role }
            | JoinOutcome::Second { role, .. }
            | JoinOutcome::AlreadyMember { role } => *role,
        }
    }
}

/// Process-wide room membership. Insertion order fixes the roles: the
/// first member of a room is the initiator, the second the responder.
///
/// Rooms are created implicitly on first join and deleted when the last
/// member leaves. Mutation for a given room key is serialized through the
/// map's entry lock, so two near-simultaneous joiners can never both be
/// assigned the initiator role.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Vec<PeerId>>,
    members: DashMap<PeerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            members: DashMap::new(),
        }
    }

    /// Add `peer` to `room`, assigning its role by arrival order.
    /// Idempotent for a peer that is already a member.
    pub fn join(&self, peer: PeerId, room: RoomId) -> Result<JoinOutcome, RegistryError> {
        let mut entry = self.rooms.entry(room.clone()).or_default();

        if let Some(pos) = entry.iter().position(|p| p == &peer) {
            return Ok(JoinOutcome::AlreadyMember {
                role: role_at(pos),
            });
        }

        if entry.len() >= 2 {
            return Err(RegistryError::RoomFull(room));
        }

        entry.push(peer.clone());
        let pos = entry.len() - 1;
        let other = entry.first().cloned();
        drop(entry);

        self.members.insert(peer.clone(), room.clone());
        info!("peer {} joined room {} as {:?}", peer, room, role_at(pos));

        Ok(match pos {
            0 => JoinOutcome::First { role: role_at(0) },
            _ => JoinOutcome::Second {
                role: role_at(1),
                // position 1 implies a first member exists
                other: other.unwrap_or(peer),
            },
        })
    }

    /// Remove `peer` from its room. Returns the room it left and the
    /// remaining member, if any, so the caller can surface the disconnect.
    /// The registry itself notifies nobody.
    pub fn leave(&self, peer: &PeerId) -> Option<(RoomId, Option<PeerId>)> {
        let (_, room) = self.members.remove(peer)?;

        let mut remaining = None;
        let mut empty = false;
        if let Some(mut entry) = self.rooms.get_mut(&room) {
            entry.retain(|p| p != peer);
            remaining = entry.first().cloned();
            empty = entry.is_empty();
        }
        if empty {
            self.rooms.remove(&room);
            debug!("room {} is empty, deleting", room);
        }

        info!("peer {} left room {}", peer, room);
        Some((room, remaining))
    }

    pub fn role_of(&self, peer: &PeerId) -> Option<Role> {
        let room = self.members.get(peer)?;
        let entry = self.rooms.get(room.value())?;
        entry.iter().position(|p| p == peer).map(role_at)
    }

    /// The other member of `peer`'s room, for message routing.
    pub fn peer_of(&self, peer: &PeerId) -> Option<PeerId> {
        let room = self.members.get(peer)?;
        let entry = self.rooms.get(room.value())?;
        entry.iter().find(|p| *p != peer).cloned()
    }

    pub fn is_member(&self, peer: &PeerId, room: &RoomId) -> bool {
        self.members
            .get(peer)
            .is_some_and(|r| r.value() == room)
    }

    /// Tear down all rooms at service stop.
    pub fn clear(&self) {
        self.rooms.clear();
        self.members.clear();
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn role_at(pos: usize) -> Role {
    if pos == 0 {
        Role::Initiator
    } else {
        Role::Responder
    }
}
