use crate::capture::CaptureError;
use crate::transport::TrackKind;
use std::fmt;
use thiserror::Error;

/// Failure inside the media transport backend.
#[derive(Debug, Error)]
#[error("{op}: {message}")]
pub struct TransportError {
    pub op: &'static str,
    pub message: String,
}

impl TransportError {
    pub fn new(op: &'static str, message: impl fmt::Display) -> Self {
        Self {
            op,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Local capture failed. Fatal to session creation; retry policy, if
    /// any, belongs to the capture collaborator.
    #[error("local media acquisition failed: {0}")]
    MediaAcquisitionFailed(#[from] CaptureError),

    /// In-place track replacement requires a matching media kind.
    #[error("substitute track must be video, got {0:?}")]
    IncompatibleTrackKind(TrackKind),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("session is closed")]
    Closed,
}
