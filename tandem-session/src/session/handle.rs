use crate::error::SessionError;
use crate::session::command::{SessionCommand, SessionEvent};
use crate::state::SessionState;
use tandem_core::SignalMessage;
use tokio::sync::{mpsc, oneshot, watch};

/// Caller-facing handle to a running session. All operations are queued
/// onto the session's single-consumer event loop.
pub struct SessionHandle<T> {
    events: mpsc::Sender<SessionEvent<T>>,
    state: watch::Receiver<SessionState>,
}

impl<T> Clone for SessionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> SessionHandle<T> {
    pub(crate) fn new(
        events: mpsc::Sender<SessionEvent<T>>,
        state: watch::Receiver<SessionState>,
    ) -> Self {
        Self { events, state }
    }

    /// Feed an inbound signaling message into the session.
    pub async fn deliver_signal(&self, msg: SignalMessage) -> Result<(), SessionError> {
        self.events
            .send(SessionEvent::Signal(msg))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Swap the outbound video source for `track` without renegotiating.
    pub async fn substitute_video_track(&self, track: T) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.events
            .send(SessionEvent::Command(
                SessionCommand::SubstituteVideoTrack { track, reply },
            ))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Switch the outbound video source back to the camera track. No-op
    /// when no substitution is active.
    pub async fn revert_video_track(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.events
            .send(SessionEvent::Command(SessionCommand::RevertVideoTrack {
                reply,
            }))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Tear the session down. Unconditional; always reaches `Closed`.
    pub async fn leave(&self) {
        let _ = self
            .events
            .send(SessionEvent::Command(SessionCommand::Leave))
            .await;
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session reaches `target`.
    pub async fn wait_for_state(&self, target: SessionState) -> Result<(), SessionError> {
        let mut rx = self.state.clone();
        rx.wait_for(|s| *s == target)
            .await
            .map(|_| ())
            .map_err(|_| SessionError::Closed)
    }
}
