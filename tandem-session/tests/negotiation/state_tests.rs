use std::sync::Arc;
use tandem_core::{RoomId, SignalMessage};
use tandem_session::{Session, SessionError, SessionState, event_channel};

use crate::negotiation::{connect_as_initiator, init_tracing, start_test_session};
use crate::utils::{FailingCapture, MockObserver, MockSignalSink, MockTransport, wait_for_signal};

#[tokio::test]
async fn capture_failure_is_fatal_and_releases_the_transport() {
    init_tracing();
    let transport = MockTransport::new();
    let (_transport_tx, transport_rx) = event_channel();
    let (sink, _sink_rx) = MockSignalSink::new();

    let result = Session::start(
        RoomId::from("r1"),
        transport.clone(),
        transport_rx,
        &FailingCapture,
        Arc::new(sink.clone()),
        Arc::new(MockObserver::new()),
    )
    .await;

    assert!(matches!(
        result.err(),
        Some(SessionError::MediaAcquisitionFailed(_))
    ));
    assert_eq!(transport.close_count(), 1);
    // Nothing was sent; the session never joined.
    assert_eq!(sink.sent_count().await, 0);
}

#[tokio::test]
async fn session_announces_the_join_after_media_is_ready() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    let msg = wait_for_signal(&mut session.sink_rx, |m| {
        matches!(m, SignalMessage::Join { .. })
    })
    .await;
    assert!(matches!(msg, SignalMessage::Join { room } if room.as_str() == "r1"));

    // Both captured tracks were attached before the join went out.
    let calls = session.transport.calls().await;
    assert!(calls.contains(&"add_local_track:mic".to_owned()));
    assert!(calls.contains(&"add_local_track:camera".to_owned()));
}

#[tokio::test]
async fn initiator_offers_exactly_once_when_its_peer_joins() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: true })
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::PeerJoined)
        .await
        .unwrap();

    let offer = wait_for_signal(&mut session.sink_rx, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(matches!(offer, SignalMessage::Offer { room, .. } if room.as_str() == "r1"));
    assert_eq!(
        session.handle.state(),
        SessionState::AwaitingRemoteAnswer
    );
    assert_eq!(session.transport.offer_count().await, 1);
}

#[tokio::test]
async fn duplicate_peer_joined_does_not_produce_a_second_offer() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: true })
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::PeerJoined)
        .await
        .unwrap();
    // Stale duplicate.
    session
        .handle
        .deliver_signal(SignalMessage::PeerJoined)
        .await
        .unwrap();

    session
        .handle
        .deliver_signal(SignalMessage::Answer {
            room: RoomId::from("r1"),
            sdp: "v=0 scripted-answer".to_owned(),
        })
        .await
        .unwrap();
    session
        .handle
        .wait_for_state(SessionState::Connected)
        .await
        .unwrap();

    assert_eq!(session.transport.offer_count().await, 1);
}

#[tokio::test]
async fn responder_ignores_an_answer_it_never_asked_for() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: false })
        .await
        .unwrap();
    // Stale answer from a previous call; must be ignored.
    session
        .handle
        .deliver_signal(SignalMessage::Answer {
            room: RoomId::from("r1"),
            sdp: "v=0 stale".to_owned(),
        })
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::Offer {
            room: RoomId::from("r1"),
            sdp: "v=0 real-offer".to_owned(),
        })
        .await
        .unwrap();

    session
        .handle
        .wait_for_state(SessionState::Connected)
        .await
        .unwrap();

    let calls = session.transport.calls().await;
    assert!(!calls.contains(&"set_remote_description:Answer".to_owned()));
    assert!(calls.contains(&"set_remote_description:Offer".to_owned()));
}

#[tokio::test]
async fn connected_requires_both_descriptions_for_the_initiator() {
    init_tracing();
    let mut session = start_test_session("r1").await;
    connect_as_initiator(&mut session, "r1").await;

    let calls = session.transport.calls().await;
    assert!(calls.contains(&"set_local_description:Offer".to_owned()));
    assert!(calls.contains(&"set_remote_description:Answer".to_owned()));
}

#[tokio::test]
async fn responder_answers_and_connects() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: false })
        .await
        .unwrap();
    session
        .handle
        .wait_for_state(SessionState::AwaitingRemoteOffer)
        .await
        .unwrap();

    session
        .handle
        .deliver_signal(SignalMessage::Offer {
            room: RoomId::from("r1"),
            sdp: "v=0 remote-offer".to_owned(),
        })
        .await
        .unwrap();

    let answer = wait_for_signal(&mut session.sink_rx, |m| {
        matches!(m, SignalMessage::Answer { .. })
    })
    .await;
    assert!(matches!(answer, SignalMessage::Answer { room, .. } if room.as_str() == "r1"));

    session
        .handle
        .wait_for_state(SessionState::Connected)
        .await
        .unwrap();

    let calls = session.transport.calls().await;
    assert!(calls.contains(&"set_remote_description:Offer".to_owned()));
    assert!(calls.contains(&"set_local_description:Answer".to_owned()));
}
