mod command;
mod handle;
#[allow(clippy::module_inception)]
mod session;

pub use command::{SessionCommand, SessionEvent};
pub use handle::SessionHandle;
pub use session::Session;
