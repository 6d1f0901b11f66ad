mod media_transport;
mod peer_connection;
mod transport_config;

pub use media_transport::{
    MediaTrack, MediaTransport, RemoteTrack, SdpKind, TrackKind, TransportEvent, event_channel,
};
pub use peer_connection::{PeerConnectionTransport, RtcTrack};
pub use transport_config::{IceServerConfig, TransportConfig};
