use crate::transport::RemoteTrack;
use async_trait::async_trait;

/// Session lifecycle callbacks exposed to the surrounding application
/// (rendering, UI controls). All methods default to no-ops.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// A remote media track became available for rendering.
    async fn on_remote_track_ready(&self, _track: RemoteTrack) {}

    /// The locally displayed video source changed (screen share started
    /// or reverted). Purely local; the remote side never sees this.
    async fn on_local_video_changed(&self, _track_id: &str) {}

    /// The session reached its terminal state. Fired exactly once.
    async fn on_closed(&self) {}
}
