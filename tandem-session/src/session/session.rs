use crate::candidate_buffer::CandidateBuffer;
use crate::capture::MediaCapture;
use crate::error::SessionError;
use crate::observer::SessionObserver;
use crate::session::command::{SessionCommand, SessionEvent};
use crate::session::handle::SessionHandle;
use crate::signal_sink::SignalSink;
use crate::state::SessionState;
use crate::transport::{MediaTrack, MediaTransport, SdpKind, TrackKind, TransportEvent};
use std::sync::Arc;
use tandem_core::{CandidateInit, Role, RoomId, SignalMessage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

const EVENT_QUEUE_DEPTH: usize = 64;

/// Per-participant negotiation state machine.
///
/// Reacts to three event sources — inbound signaling, transport events,
/// and user commands — all funneled through one loop so no transition is
/// ever interleaved with another.
pub struct Session<T: MediaTransport> {
    room: RoomId,
    transport: T,
    sink: Arc<dyn SignalSink>,
    observer: Arc<dyn SessionObserver>,
    state: SessionState,
    state_tx: watch::Sender<SessionState>,
    role: Option<Role>,
    local_description_set: bool,
    remote_description_set: bool,
    buffer: CandidateBuffer,
    camera_video: T::Track,
    substitute_video: Option<T::Track>,
}

impl<T: MediaTransport> Session<T> {
    /// Acquire local media, attach it to `transport`, announce the join
    /// and spawn the session event loop.
    ///
    /// `transport_events` is the receiving end of the channel the
    /// transport was constructed with. Capture failure is fatal and
    /// releases the transport before returning.
    pub async fn start<C>(
        room: RoomId,
        transport: T,
        transport_events: mpsc::Receiver<TransportEvent>,
        capture: &C,
        sink: Arc<dyn SignalSink>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<SessionHandle<T::Track>, SessionError>
    where
        C: MediaCapture<Track = T::Track> + ?Sized,
    {
        let media = match capture.capture().await {
            Ok(media) => media,
            Err(e) => {
                release(&transport).await;
                return Err(SessionError::MediaAcquisitionFailed(e));
            }
        };

        let camera_video = media.video.clone();
        for track in [media.audio, media.video] {
            if let Err(e) = transport.add_local_track(track).await {
                release(&transport).await;
                return Err(e.into());
            }
        }

        let (state_tx, state_rx) = watch::channel(SessionState::LocalMediaReady);
        info!("local media ready, joining room {}", room);
        sink.send(SignalMessage::Join { room: room.clone() }).await;

        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let session = Self {
            room,
            transport,
            sink,
            observer,
            state: SessionState::LocalMediaReady,
            state_tx,
            role: None,
            local_description_set: false,
            remote_description_set: false,
            buffer: CandidateBuffer::new(),
            camera_video,
            substitute_video: None,
        };

        tokio::spawn(session.run(events_rx, transport_events));

        Ok(SessionHandle::new(events_tx, state_rx))
    }

    async fn run(
        mut self,
        mut events: mpsc::Receiver<SessionEvent<T::Track>>,
        mut transport_events: mpsc::Receiver<TransportEvent>,
    ) {
        debug!("session event loop started for room {}", self.room);

        while !self.state.is_closed() {
            tokio::select! {
                ev = events.recv() => match ev {
                    Some(SessionEvent::Signal(msg)) => self.handle_signal(msg).await,
                    Some(SessionEvent::Command(cmd)) => self.handle_command(cmd).await,
                    None => self.close().await,
                },
                ev = transport_events.recv() => match ev {
                    Some(ev) => self.handle_transport_event(ev).await,
                    None => self.close().await,
                },
            }
        }

        debug!("session event loop finished for room {}", self.room);
    }

    async fn handle_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Role { initiator } => {
                let role = if initiator {
                    Role::Initiator
                } else {
                    Role::Responder
                };
                debug!("assigned role {:?}", role);
                self.role = Some(role);
                if !initiator && self.state == SessionState::LocalMediaReady {
                    self.set_state(SessionState::AwaitingRemoteOffer);
                }
            }

            SignalMessage::PeerJoined => {
                let initiator = self.role.is_some_and(|r| r.is_initiator());
                if initiator && self.state == SessionState::LocalMediaReady {
                    if let Err(e) = self.send_offer().await {
                        error!("offer creation failed: {}", e);
                        self.close().await;
                    }
                } else {
                    self.out_of_order("peer-joined notice");
                }
            }

            SignalMessage::Offer { sdp, .. } => {
                if self.state == SessionState::AwaitingRemoteOffer {
                    if let Err(e) = self.accept_offer(sdp).await {
                        error!("answering failed: {}", e);
                        self.close().await;
                    }
                } else {
                    self.out_of_order("offer");
                }
            }

            SignalMessage::Answer { sdp, .. } => {
                if self.state == SessionState::AwaitingRemoteAnswer {
                    if let Err(e) = self.accept_answer(sdp).await {
                        error!("applying answer failed: {}", e);
                        self.close().await;
                    }
                } else {
                    self.out_of_order("answer");
                }
            }

            SignalMessage::Candidate { candidate, .. } => {
                self.handle_remote_candidate(candidate).await;
            }

            SignalMessage::PeerLeft => {
                info!("peer left room {}", self.room);
                self.close().await;
            }

            SignalMessage::Join { .. } => self.out_of_order("join"),
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::LocalCandidate(candidate) => {
                // One-way local-to-remote signal, sent regardless of
                // negotiation state.
                self.sink
                    .send(SignalMessage::Candidate {
                        room: self.room.clone(),
                        candidate,
                    })
                    .await;
            }
            TransportEvent::RemoteTrack(track) => {
                debug!("remote track ready: {}", track.id);
                self.observer.on_remote_track_ready(track).await;
            }
            TransportEvent::Disconnected => {
                info!("transport disconnected");
                self.close().await;
            }
        }
    }

    async fn handle_command(&mut self, cmd: SessionCommand<T::Track>) {
        match cmd {
            SessionCommand::SubstituteVideoTrack { track, reply } => {
                let _ = reply.send(self.substitute_video_track(track).await);
            }
            SessionCommand::RevertVideoTrack { reply } => {
                let _ = reply.send(self.revert_video_track().await);
            }
            SessionCommand::Leave => {
                info!("leaving room {}", self.room);
                self.close().await;
            }
        }
    }

    /// Initiator path: produce and send the one offer for this session.
    async fn send_offer(&mut self) -> Result<(), SessionError> {
        self.set_state(SessionState::Offering);

        let sdp = self.transport.create_offer().await?;
        self.transport
            .set_local_description(SdpKind::Offer, sdp.clone())
            .await?;
        self.local_description_set = true;

        self.sink
            .send(SignalMessage::Offer {
                room: self.room.clone(),
                sdp,
            })
            .await;

        self.set_state(SessionState::AwaitingRemoteAnswer);
        Ok(())
    }

    /// Responder path: apply the remote offer, drain buffered candidates,
    /// answer.
    async fn accept_offer(&mut self, sdp: String) -> Result<(), SessionError> {
        self.transport
            .set_remote_description(SdpKind::Offer, sdp)
            .await?;
        self.remote_description_set = true;
        self.flush_candidates().await;

        let answer = self.transport.create_answer().await?;
        self.transport
            .set_local_description(SdpKind::Answer, answer.clone())
            .await?;
        self.local_description_set = true;

        self.sink
            .send(SignalMessage::Answer {
                room: self.room.clone(),
                sdp: answer,
            })
            .await;

        self.set_state(SessionState::Connected);
        Ok(())
    }

    async fn accept_answer(&mut self, sdp: String) -> Result<(), SessionError> {
        self.transport
            .set_remote_description(SdpKind::Answer, sdp)
            .await?;
        self.remote_description_set = true;
        self.flush_candidates().await;

        self.set_state(SessionState::Connected);
        Ok(())
    }

    async fn handle_remote_candidate(&mut self, candidate: CandidateInit) {
        if self.remote_description_set {
            if let Err(e) = self.transport.add_remote_candidate(candidate).await {
                warn!("failed to apply remote candidate: {}", e);
            }
        } else {
            debug!("buffering candidate until the remote description is set");
            self.buffer.push(candidate);
        }
    }

    /// Apply everything buffered, in arrival order. Candidates arriving
    /// from here on are applied directly and never re-enter the buffer.
    async fn flush_candidates(&mut self) {
        let pending = self.buffer.take_all();
        if pending.is_empty() {
            return;
        }
        debug!("flushing {} buffered candidates", pending.len());
        for candidate in pending {
            if let Err(e) = self.transport.add_remote_candidate(candidate).await {
                warn!("failed to apply buffered candidate: {}", e);
            }
        }
    }

    async fn substitute_video_track(&mut self, track: T::Track) -> Result<(), SessionError> {
        if track.kind() != TrackKind::Video {
            return Err(SessionError::IncompatibleTrackKind(track.kind()));
        }

        self.transport.replace_video_track(track.clone()).await?;
        let id = track.id().to_owned();
        self.substitute_video = Some(track);
        self.observer.on_local_video_changed(&id).await;
        Ok(())
    }

    async fn revert_video_track(&mut self) -> Result<(), SessionError> {
        if self.substitute_video.take().is_none() {
            return Ok(());
        }

        self.transport
            .replace_video_track(self.camera_video.clone())
            .await?;
        self.observer
            .on_local_video_changed(self.camera_video.id())
            .await;
        Ok(())
    }

    /// Unconditional transition to `Closed`. Idempotent; releases the
    /// transport exactly once and discards unflushed candidates.
    async fn close(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.set_state(SessionState::Closed);

        if !self.buffer.is_empty() {
            debug!("discarding {} unflushed candidates", self.buffer.len());
            self.buffer.clear();
        }

        release(&self.transport).await;
        self.observer.on_closed().await;
    }

    fn set_state(&mut self, next: SessionState) {
        debug!("session state: {} -> {}", self.state, next);
        self.state = next;
        let _ = self.state_tx.send(next);
    }

    fn out_of_order(&self, what: &str) {
        warn!(
            "ignoring out-of-order {} in state {} (stale or duplicate signal)",
            what, self.state
        );
    }
}

async fn release<T: MediaTransport>(transport: &T) {
    if let Err(e) = transport.close().await {
        warn!("failed to close media transport: {}", e);
    }
}
