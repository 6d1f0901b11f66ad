use crate::error::TransportError;
use crate::transport::media_transport::{
    MediaTrack, MediaTransport, RemoteTrack, SdpKind, TrackKind, TransportEvent,
};
use crate::transport::transport_config::TransportConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::CandidateInit;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;

/// A locally published track backed by the webrtc crate.
#[derive(Clone)]
pub struct RtcTrack {
    inner: Arc<dyn TrackLocal + Send + Sync>,
    id: String,
    kind: TrackKind,
}

impl RtcTrack {
    pub fn new(inner: Arc<dyn TrackLocal + Send + Sync>) -> Self {
        let id = inner.id().to_owned();
        let kind = match inner.kind() {
            RTPCodecType::Video => TrackKind::Video,
            // Capture never produces unspecified kinds.
            _ => TrackKind::Audio,
        };
        Self { inner, id, kind }
    }
}

impl MediaTrack for RtcTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }
}

/// [`MediaTransport`] over a native `RTCPeerConnection`.
///
/// Asynchronous peer connection callbacks (discovered candidates, remote
/// tracks, connection state changes) are forwarded onto the event channel
/// supplied at construction, where the owning session consumes them
/// sequentially.
pub struct PeerConnectionTransport {
    pc: Arc<RTCPeerConnection>,
}

impl PeerConnectionTransport {
    pub async fn new(
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(|e| TransportError::new("register codecs", e))?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| TransportError::new("register interceptors", e))?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .into_iter()
                .map(|s| RTCIceServer {
                    urls: s.urls,
                    username: s.username.unwrap_or_default(),
                    credential: s.credential.unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .map_err(|e| TransportError::new("create peer connection", e))?,
        );

        let state_tx = event_tx.clone();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let tx = state_tx.clone();
            Box::pin(async move {
                info!("peer connection state changed: {:?}", s);
                match s {
                    RTCPeerConnectionState::Failed
                    | RTCPeerConnectionState::Disconnected
                    | RTCPeerConnectionState::Closed => {
                        let _ = tx.send(TransportEvent::Disconnected).await;
                    }
                    _ => {}
                }
            })
        }));

        let ice_tx = event_tx.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::LocalCandidate(CandidateInit {
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_mline_index: init.sdp_mline_index,
                    }))
                    .await;
            })
        }));

        let track_tx = event_tx.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = track_tx.clone();
            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Video => TrackKind::Video,
                    _ => TrackKind::Audio,
                };
                debug!("remote track arrived: id={} kind={:?}", track.id(), kind);
                let _ = tx
                    .send(TransportEvent::RemoteTrack(RemoteTrack {
                        id: track.id(),
                        kind,
                    }))
                    .await;
            })
        }));

        Ok(Self { pc })
    }
}

fn description(kind: SdpKind, sdp: String) -> Result<RTCSessionDescription, TransportError> {
    match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp),
        SdpKind::Answer => RTCSessionDescription::answer(sdp),
    }
    .map_err(|e| TransportError::new("parse description", e))
}

#[async_trait]
impl MediaTransport for PeerConnectionTransport {
    type Track = RtcTrack;

    async fn add_local_track(&self, track: RtcTrack) -> Result<(), TransportError> {
        self.pc
            .add_track(track.inner.clone())
            .await
            .map_err(|e| TransportError::new("add local track", e))?;
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .map_err(|e| TransportError::new("create offer", e))?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, TransportError> {
        let answer = self
            .pc
            .create_answer(None)
            .await
            .map_err(|e| TransportError::new("create answer", e))?;
        Ok(answer.sdp)
    }

    async fn set_local_description(
        &self,
        kind: SdpKind,
        sdp: String,
    ) -> Result<(), TransportError> {
        self.pc
            .set_local_description(description(kind, sdp)?)
            .await
            .map_err(|e| TransportError::new("set local description", e))
    }

    async fn set_remote_description(
        &self,
        kind: SdpKind,
        sdp: String,
    ) -> Result<(), TransportError> {
        self.pc
            .set_remote_description(description(kind, sdp)?)
            .await
            .map_err(|e| TransportError::new("set remote description", e))
    }

    async fn add_remote_candidate(&self, candidate: CandidateInit) -> Result<(), TransportError> {
        self.pc
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_mline_index,
                username_fragment: None,
            })
            .await
            .map_err(|e| TransportError::new("add remote candidate", e))
    }

    async fn replace_video_track(&self, track: RtcTrack) -> Result<(), TransportError> {
        for sender in self.pc.get_senders().await {
            let Some(current) = sender.track().await else {
                continue;
            };
            if current.kind() == RTPCodecType::Video {
                return sender
                    .replace_track(Some(track.inner.clone()))
                    .await
                    .map_err(|e| TransportError::new("replace video track", e));
            }
        }
        Err(TransportError::new(
            "replace video track",
            "no outbound video sender",
        ))
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.pc
            .close()
            .await
            .map_err(|e| TransportError::new("close peer connection", e))
    }
}
