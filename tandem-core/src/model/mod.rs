mod peer;
mod role;
mod room;
mod signaling;

pub use peer::PeerId;
pub use role::Role;
pub use room::RoomId;
pub use signaling::{CandidateInit, SignalMessage};
