use crate::error::SessionError;
use tandem_core::SignalMessage;
use tokio::sync::oneshot;

/// User-initiated operations, submitted through the session handle.
#[derive(Debug)]
pub enum SessionCommand<T> {
    SubstituteVideoTrack {
        track: T,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    RevertVideoTrack {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Leave,
}

/// Everything the session reacts to, funneled through one queue so each
/// transition runs to completion before the next event is processed.
#[derive(Debug)]
pub enum SessionEvent<T> {
    /// Inbound signaling message delivered by the relay transport.
    Signal(SignalMessage),
    Command(SessionCommand<T>),
}
