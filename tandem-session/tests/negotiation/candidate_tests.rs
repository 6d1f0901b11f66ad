use tandem_core::{CandidateInit, RoomId, SignalMessage};
use tandem_session::{SessionState, TransportEvent};

use crate::negotiation::{call_index, init_tracing, start_test_session};
use crate::utils::wait_for_signal;

fn candidate(name: &str) -> CandidateInit {
    CandidateInit {
        candidate: name.to_owned(),
        sdp_mid: Some("0".into()),
        sdp_mline_index: Some(0),
    }
}

fn candidate_signal(room: &str, name: &str) -> SignalMessage {
    SignalMessage::Candidate {
        room: RoomId::from(room),
        candidate: candidate(name),
    }
}

#[tokio::test]
async fn early_candidates_are_flushed_in_order_after_the_offer_is_applied() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: false })
        .await
        .unwrap();
    // Candidates outrun the offer; they must wait for the remote
    // description.
    session
        .handle
        .deliver_signal(candidate_signal("r1", "cand-1"))
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(candidate_signal("r1", "cand-2"))
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::Offer {
            room: RoomId::from("r1"),
            sdp: "v=0 offer".to_owned(),
        })
        .await
        .unwrap();
    session
        .handle
        .wait_for_state(SessionState::Connected)
        .await
        .unwrap();

    assert_eq!(
        session.transport.applied_candidates().await,
        vec!["cand-1", "cand-2"]
    );

    // The flush happened after the description was applied and before
    // the answer was produced.
    let calls = session.transport.calls().await;
    let remote_set = call_index(&calls, "set_remote_description:Offer");
    let first = call_index(&calls, "add_remote_candidate:cand-1");
    let second = call_index(&calls, "add_remote_candidate:cand-2");
    let answered = call_index(&calls, "create_answer");
    assert!(remote_set < first);
    assert!(first < second);
    assert!(second < answered);
}

#[tokio::test]
async fn candidates_after_the_flush_bypass_the_buffer() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: false })
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::Offer {
            room: RoomId::from("r1"),
            sdp: "v=0 offer".to_owned(),
        })
        .await
        .unwrap();
    session
        .handle
        .wait_for_state(SessionState::Connected)
        .await
        .unwrap();

    session
        .handle
        .deliver_signal(candidate_signal("r1", "cand-late"))
        .await
        .unwrap();
    // The queue is FIFO; a completed round trip means the candidate was
    // processed.
    session.handle.revert_video_track().await.unwrap();

    assert_eq!(
        session.transport.applied_candidates().await,
        vec!["cand-late"]
    );
}

#[tokio::test]
async fn locally_discovered_candidates_are_relayed_with_room_scope() {
    init_tracing();
    let mut session = start_test_session("r1").await;

    session
        .transport_tx
        .send(TransportEvent::LocalCandidate(candidate("local-1")))
        .await
        .unwrap();

    let msg = wait_for_signal(&mut session.sink_rx, |m| {
        matches!(m, SignalMessage::Candidate { .. })
    })
    .await;
    assert!(matches!(
        msg,
        SignalMessage::Candidate { room, candidate }
            if room.as_str() == "r1" && candidate.candidate == "local-1"
    ));
}

#[tokio::test]
async fn unflushed_candidates_are_discarded_when_the_session_closes() {
    init_tracing();
    let session = start_test_session("r1").await;

    session
        .handle
        .deliver_signal(SignalMessage::Role { initiator: false })
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(candidate_signal("r1", "cand-doomed"))
        .await
        .unwrap();
    session
        .handle
        .deliver_signal(SignalMessage::PeerLeft)
        .await
        .unwrap();
    session
        .handle
        .wait_for_state(SessionState::Closed)
        .await
        .unwrap();

    assert!(session.transport.applied_candidates().await.is_empty());
}
