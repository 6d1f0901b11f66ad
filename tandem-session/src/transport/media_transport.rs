use crate::error::TransportError;
use async_trait::async_trait;
use tandem_core::CandidateInit;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Which side of the offer/answer exchange a description belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// A locally published media track as seen by the session.
pub trait MediaTrack {
    fn id(&self) -> &str;
    fn kind(&self) -> TrackKind;
}

/// A remote track surfaced by the transport, ready for rendering.
#[derive(Debug, Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: TrackKind,
}

/// Events the transport raises asynchronously into the session's event
/// queue.
#[derive(Debug)]
pub enum TransportEvent {
    /// A connectivity candidate was discovered locally. Relayed to the
    /// remote side regardless of negotiation state.
    LocalCandidate(CandidateInit),
    /// A remote media track arrived.
    RemoteTrack(RemoteTrack),
    /// The underlying connection failed or was closed by the peer.
    Disconnected,
}

/// The imperative surface of the real-time media stack the session
/// drives. Implementations raise [`TransportEvent`]s on the channel they
/// were constructed with.
///
/// Description generation and application are async; the session awaits
/// each before taking the next dependent step.
#[async_trait]
pub trait MediaTransport: Send + Sync + 'static {
    type Track: MediaTrack + Clone + Send + Sync + 'static;

    async fn add_local_track(&self, track: Self::Track) -> Result<(), TransportError>;

    async fn create_offer(&self) -> Result<String, TransportError>;

    async fn create_answer(&self) -> Result<String, TransportError>;

    async fn set_local_description(&self, kind: SdpKind, sdp: String)
    -> Result<(), TransportError>;

    async fn set_remote_description(
        &self,
        kind: SdpKind,
        sdp: String,
    ) -> Result<(), TransportError>;

    async fn add_remote_candidate(&self, candidate: CandidateInit) -> Result<(), TransportError>;

    /// Replace the source of the outbound video sender in place. The new
    /// track must be of video kind; this is the transport contract that
    /// makes screen share work without renegotiation.
    async fn replace_video_track(&self, track: Self::Track) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Channel pair for transport events feeding a session's event loop.
pub fn event_channel() -> (mpsc::Sender<TransportEvent>, mpsc::Receiver<TransportEvent>) {
    mpsc::channel(256)
}
