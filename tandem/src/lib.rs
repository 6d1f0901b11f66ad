pub use tandem_core::{CandidateInit, PeerId, Role, RoomId, SignalMessage};

pub mod model {
    pub use tandem_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_server::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use tandem_session::*;
}
