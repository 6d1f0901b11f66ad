use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("media capture failed: {0}")]
pub struct CaptureError(pub String);

/// One audio and one video track captured together.
pub struct LocalMedia<T> {
    pub audio: T,
    pub video: T,
}

/// The external capture collaborator (camera/microphone/display).
///
/// Capture itself is out of scope for this crate; the session only needs
/// the acquired tracks. A capture failure is fatal to session creation
/// and is never retried here.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    type Track;

    async fn capture(&self) -> Result<LocalMedia<Self::Track>, CaptureError>;
}
