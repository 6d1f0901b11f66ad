use tandem_core::{CandidateInit, PeerId, RoomId, SignalMessage};

use crate::integration::{create_test_relay, init_tracing};

fn offer(room: &str, sdp: &str) -> SignalMessage {
    SignalMessage::Offer {
        room: RoomId::from(room),
        sdp: sdp.to_owned(),
    }
}

fn candidate(room: &str, c: &str) -> SignalMessage {
    SignalMessage::Candidate {
        room: RoomId::from(room),
        candidate: CandidateInit {
            candidate: c.to_owned(),
            sdp_mid: Some("0".into()),
            sdp_mline_index: Some(0),
        },
    }
}

#[tokio::test]
async fn offer_is_delivered_to_the_other_member_only() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let a = PeerId::new();
    let b = PeerId::new();
    relay.handle_join(&a, RoomId::from("r1")).await.unwrap();
    relay.handle_join(&b, RoomId::from("r1")).await.unwrap();

    relay.forward(&a, offer("r1", "sdp1")).await;

    let to_b = sink.messages_for(&b).await;
    assert!(
        to_b.iter()
            .any(|m| matches!(m, SignalMessage::Offer { sdp, .. } if sdp == "sdp1"))
    );
    let to_a = sink.messages_for(&a).await;
    assert!(!to_a.iter().any(|m| matches!(m, SignalMessage::Offer { .. })));
}

#[tokio::test]
async fn answer_is_routed_back_to_the_initiator() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let a = PeerId::new();
    let b = PeerId::new();
    relay.handle_join(&a, RoomId::from("r1")).await.unwrap();
    relay.handle_join(&b, RoomId::from("r1")).await.unwrap();

    relay.forward(&a, offer("r1", "sdp1")).await;
    relay
        .forward(
            &b,
            SignalMessage::Answer {
                room: RoomId::from("r1"),
                sdp: "sdp2".into(),
            },
        )
        .await;

    let to_a = sink.messages_for(&a).await;
    assert!(
        to_a.iter()
            .any(|m| matches!(m, SignalMessage::Answer { sdp, .. } if sdp == "sdp2"))
    );
}

#[tokio::test]
async fn candidates_are_forwarded_in_send_order() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let a = PeerId::new();
    let b = PeerId::new();
    relay.handle_join(&a, RoomId::from("r1")).await.unwrap();
    relay.handle_join(&b, RoomId::from("r1")).await.unwrap();

    for i in 0..3 {
        relay.forward(&a, candidate("r1", &format!("cand-{i}"))).await;
    }

    let received: Vec<String> = sink
        .messages_for(&b)
        .await
        .into_iter()
        .filter_map(|m| match m {
            SignalMessage::Candidate { candidate, .. } => Some(candidate.candidate),
            _ => None,
        })
        .collect();
    assert_eq!(received, vec!["cand-0", "cand-1", "cand-2"]);
}

#[tokio::test]
async fn mismatched_room_scope_is_dropped() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let a = PeerId::new();
    let b = PeerId::new();
    relay.handle_join(&a, RoomId::from("r1")).await.unwrap();
    relay.handle_join(&b, RoomId::from("r1")).await.unwrap();
    let before = sink.delivery_count().await;

    // a is a member of r1, not r2; the relay must not route this.
    relay.forward(&a, offer("r2", "sdp1")).await;

    assert_eq!(sink.delivery_count().await, before);
}

#[tokio::test]
async fn messages_from_non_members_are_dropped() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let outsider = PeerId::new();

    relay.forward(&outsider, offer("r1", "sdp1")).await;

    assert_eq!(sink.delivery_count().await, 0);
}

#[tokio::test]
async fn offer_before_a_second_member_exists_is_dropped() {
    init_tracing();
    let (relay, sink, _rx) = create_test_relay();
    let a = PeerId::new();
    relay.handle_join(&a, RoomId::from("r1")).await.unwrap();
    let before = sink.delivery_count().await;

    relay.forward(&a, offer("r1", "sdp1")).await;

    assert_eq!(sink.delivery_count().await, before);
}
