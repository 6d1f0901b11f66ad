mod candidate_buffer;
mod capture;
mod error;
mod observer;
mod session;
mod signal_sink;
mod state;
mod transport;

pub use candidate_buffer::CandidateBuffer;
pub use capture::{CaptureError, LocalMedia, MediaCapture};
pub use error::{SessionError, TransportError};
pub use observer::SessionObserver;
pub use session::{Session, SessionCommand, SessionEvent, SessionHandle};
pub use signal_sink::SignalSink;
pub use state::SessionState;
pub use transport::{
    IceServerConfig, MediaTrack, MediaTransport, PeerConnectionTransport, RemoteTrack, RtcTrack,
    SdpKind, TrackKind, TransportConfig, TransportEvent, event_channel,
};
