//! Outbound envelope encoding.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{TimeZone, Utc};

use chatsync_core::model::{Message, PeerId, Tag, SELF_PENDING_SENDER};
use chatsync_core::protocol::OutboundEnvelope;

#[test]
fn msg_envelope_wire_shape() {
    let at = Utc.with_ymd_and_hms(2024, 2, 22, 3, 6, 53).unwrap();
    let env = OutboundEnvelope::message("hi", at, Tag::from("t-1"));
    let v: serde_json::Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();

    assert_eq!(v["event"], "MSG");
    assert_eq!(v["content"], "hi");
    assert_eq!(v["tag"], "t-1");
    assert_eq!(v["sent_at"], "2024-02-22T03:06:53Z");
}

#[test]
fn join_carries_peer_and_fresh_tag() {
    let peer = PeerId::from("7");
    let a = OutboundEnvelope::join(&peer, Utc::now());
    let b = OutboundEnvelope::join(&peer, Utc::now());

    let v: serde_json::Value = serde_json::from_str(&a.to_json().unwrap()).unwrap();
    assert_eq!(v["event"], "JOIN");
    assert_eq!(v["content"], "7");
    assert_ne!(a.tag, b.tag);
}

#[test]
fn tags_are_uuid_width() {
    let tag = Tag::generate();
    assert_eq!(tag.as_str().len(), 36);
}

#[test]
fn self_authorship_prefers_author_flag() {
    let peer = PeerId::from("7");
    let mut m = Message::provisional("x", Utc::now(), Some(peer.clone()));
    assert_eq!(m.sender_id.as_str(), SELF_PENDING_SENDER);
    assert!(m.authored_by_self(&peer));

    m.author = None;
    assert!(m.authored_by_self(&peer));

    m.receiver_id = PeerId::from("42");
    assert!(!m.authored_by_self(&peer));

    m.author = Some(true);
    assert!(m.authored_by_self(&peer));
}

#[test]
fn conversation_prefers_chat_id() {
    let mut m = Message::provisional("x", Utc::now(), Some(PeerId::from("42")));
    assert_eq!(m.conversation().map(|p| p.as_str()), Some("42"));

    m.chat_id = Some(PeerId::from("7"));
    assert_eq!(m.conversation().map(|p| p.as_str()), Some("7"));

    m.chat_id = None;
    m.receiver_id = PeerId::default();
    assert!(m.conversation().is_none());
}
