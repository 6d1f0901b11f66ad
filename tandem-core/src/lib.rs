pub mod model;

pub use model::{CandidateInit, PeerId, Role, RoomId, SignalMessage};
