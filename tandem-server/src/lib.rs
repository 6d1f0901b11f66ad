mod registry;
mod relay;
mod signaling;

pub use registry::{JoinOutcome, RegistryError, RoomRegistry};
pub use relay::{ClientSink, RelayService};
pub use signaling::{AppState, WsClients, ws_handler};
