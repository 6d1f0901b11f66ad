mod room_registry;

pub use room_registry::{JoinOutcome, RegistryError, RoomRegistry};
