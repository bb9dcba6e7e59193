//! Sync engine scenarios: optimistic send, acknowledgment, read batches,
//! chat list merges, history, and pending expiry.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::{Duration, Instant};

use serde_json::json;

use chatsync_client::config::ReadScope;
use chatsync_client::engine::{ConnectionState, SyncOptions};
use chatsync_core::model::{DeliveryStatus, PeerId, SummaryRecord};
use chatsync_core::protocol::OutboundEvent;

mod support;
use support::{engine_with, msg, open_engine};

fn ack_frame(tag: &str, content: &str, sender: &str, read: bool) -> String {
    json!({
        "event": "MSG",
        "tag": tag,
        "payload": {
            "content": content,
            "readAt": if read { json!("2024-02-22T03:07:00Z") } else { json!(null) },
            "senderId": sender,
        }
    })
    .to_string()
}

#[test]
fn send_while_closed_is_rejected_without_side_effects() {
    let (mut engine, log) = engine_with(SyncOptions::default());

    let err = engine.send("hi").expect_err("connecting is not open");
    assert_eq!(err.client_code().as_str(), "DISCONNECTED");

    engine.on_open();
    engine.on_close();
    let err = engine.send("hi").expect_err("closed is not open");
    assert_eq!(err.client_code().as_str(), "DISCONNECTED");

    assert!(log.lock().unwrap().is_empty());
    assert!(engine.presentation().messages.is_empty());
    assert!(engine.outbound().sent.is_empty());
    assert_eq!(engine.pending_count(), 0);
}

#[test]
fn empty_content_is_rejected() {
    let mut engine = open_engine();
    let err = engine.send("").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "EMPTY_CONTENT");
    assert!(engine.outbound().sent.is_empty());
}

#[test]
fn optimistic_display_precedes_transmission() {
    let (mut engine, log) = engine_with(SyncOptions::default());
    engine.on_open();

    engine.send("hi").unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["append:hi", "transmit:MSG"]);
    let shown = &engine.presentation().messages[0];
    assert_eq!(shown.sender_id.as_str(), "self-pending");
    assert!(shown.read_at.is_none());
    assert_eq!(engine.presentation().status(0), DeliveryStatus::Sending);
}

#[test]
fn ack_marks_sent_and_queues_for_read() {
    let mut engine = open_engine();
    let tag = engine.send("hi").unwrap();

    let out = &engine.outbound().sent[0];
    assert_eq!(out.event, OutboundEvent::Msg);
    assert_eq!(out.content, "hi");
    assert_eq!(out.tag, tag);
    assert_eq!(engine.pending_count(), 1);

    engine.on_frame(&ack_frame(tag.as_str(), "hi", "42", false));

    let ui = engine.presentation();
    assert_eq!(ui.status(0), DeliveryStatus::Sent);
    assert_eq!(ui.senders[0].as_ref().map(|p| p.as_str()), Some("42"));
    assert_eq!(ui.messages.len(), 1, "ack must not append a second bubble");
    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.awaiting_read_count(), 1);
}

#[test]
fn ack_already_read_skips_queue() {
    let mut engine = open_engine();
    let tag = engine.send("hi").unwrap();

    engine.on_frame(&ack_frame(tag.as_str(), "hi", "42", true));

    assert_eq!(engine.presentation().status(0), DeliveryStatus::Read);
    assert_eq!(engine.awaiting_read_count(), 0);
    assert_eq!(engine.pending_count(), 0);
}

#[test]
fn read_batch_marks_everything_and_empties_queue() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();
    let a = engine.send("one").unwrap();
    engine.join_conversation(PeerId::from("8")).unwrap();
    let b = engine.send("two").unwrap();

    engine.on_frame(&ack_frame(a.as_str(), "one", "42", false));
    engine.on_frame(&ack_frame(b.as_str(), "two", "42", false));
    assert_eq!(engine.awaiting_read_count(), 2);

    engine.on_frame(r#"{"event":"READ"}"#);

    assert_eq!(engine.presentation().status(0), DeliveryStatus::Read);
    assert_eq!(engine.presentation().status(1), DeliveryStatus::Read);
    assert_eq!(engine.awaiting_read_count(), 0);
}

#[test]
fn read_batch_on_empty_queue_is_noop() {
    let (mut engine, log) = engine_with(SyncOptions::default());
    engine.on_open();

    engine.on_frame(r#"{"event":"READ"}"#);

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(engine.awaiting_read_count(), 0);
}

#[test]
fn per_peer_read_scope_leaves_other_conversations_queued() {
    let (mut engine, _log) = engine_with(SyncOptions {
        read_scope: ReadScope::PerPeer,
        ..Default::default()
    });
    engine.on_open();

    engine.join_conversation(PeerId::from("7")).unwrap();
    let a = engine.send("to seven").unwrap();
    engine.join_conversation(PeerId::from("8")).unwrap();
    let b = engine.send("to eight").unwrap();
    engine.on_frame(&ack_frame(a.as_str(), "to seven", "42", false));
    engine.on_frame(&ack_frame(b.as_str(), "to eight", "42", false));

    engine.on_frame(r#"{"event":"READ","payload":{"chat_id":"7"}}"#);
    assert_eq!(engine.presentation().status(0), DeliveryStatus::Read);
    assert_eq!(engine.presentation().status(1), DeliveryStatus::Sent);
    assert_eq!(engine.awaiting_read_count(), 1);

    // no conversation named: falls back to everything
    engine.on_frame(r#"{"event":"READ"}"#);
    assert_eq!(engine.presentation().status(1), DeliveryStatus::Read);
    assert_eq!(engine.awaiting_read_count(), 0);
}

#[test]
fn chats_update_merges_into_bootstrapped_summary() {
    let mut engine = open_engine();
    engine.apply_conversation_list(vec![SummaryRecord::new("7", "hey", 3)]);

    engine.on_frame(r#"{"event":"CHATS","payload":{"user_id":"7","content":"","unread_messages":2}}"#);

    let peer = PeerId::from("7");
    let s = engine.summary(&peer).unwrap();
    assert_eq!(s.preview, "hey");
    assert_eq!(s.unread_count, 5);

    engine.on_frame(r#"{"event":"CHATS","payload":{"user_id":"7","content":"bye","unread_messages":0}}"#);
    let s = engine.summary(&peer).unwrap();
    assert_eq!(s.preview, "bye");
    assert_eq!(s.unread_count, 0);

    let updates = &engine.presentation().summary_updates;
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].0, peer);
}

#[test]
fn chats_update_for_unknown_peer_is_ignored() {
    let (mut engine, log) = engine_with(SyncOptions::default());
    engine.on_open();
    engine.apply_conversation_list(vec![SummaryRecord::new("7", "hey", 3)]);
    log.lock().unwrap().clear();

    engine.on_frame(r#"{"event":"CHATS","payload":{"user_id":"9","content":"x","unread_messages":4}}"#);

    assert!(log.lock().unwrap().is_empty());
    assert!(engine.summary(&PeerId::from("9")).is_none());
}

#[test]
fn bootstrap_replaces_prior_summaries() {
    let mut engine = open_engine();
    engine.apply_conversation_list(vec![
        SummaryRecord::new("7", "hey", 3),
        SummaryRecord::new("8", "yo", 1),
    ]);
    engine.on_frame(r#"{"event":"CHATS","payload":{"user_id":"7","content":"","unread_messages":4}}"#);

    engine.apply_conversation_list(vec![SummaryRecord::new("7", "fresh", 1)]);

    let s = engine.summary(&PeerId::from("7")).unwrap();
    assert_eq!(s.unread_count, 1);
    assert_eq!(s.preview, "fresh");
    assert!(engine.summary(&PeerId::from("8")).is_none());
}

#[test]
fn join_transmits_and_preserves_pending_state() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();
    let tag = engine.send("pending").unwrap();
    let acked = engine.send("acked").unwrap();
    engine.on_frame(&ack_frame(acked.as_str(), "acked", "42", false));

    engine.join_conversation(PeerId::from("8")).unwrap();

    assert_eq!(engine.focused().map(|p| p.as_str()), Some("8"));
    let join = engine.outbound().sent.last().unwrap();
    assert_eq!(join.event, OutboundEvent::Join);
    assert_eq!(join.content, "8");
    assert_eq!(engine.pending_count(), 1);
    assert_eq!(engine.awaiting_read_count(), 1);

    // a late ack from the previous conversation still resolves
    engine.on_frame(&ack_frame(tag.as_str(), "pending", "42", false));
    assert_eq!(engine.presentation().status(0), DeliveryStatus::Sent);
    assert_eq!(engine.pending_count(), 0);
}

#[test]
fn join_while_connecting_is_announced_on_open() {
    let (mut engine, log) = engine_with(SyncOptions::default());

    engine.join_conversation(PeerId::from("7")).unwrap();
    assert_eq!(engine.focused().map(|p| p.as_str()), Some("7"));
    assert!(engine.outbound().sent.is_empty());

    engine.on_open();
    engine.send("hi").unwrap();

    let events: Vec<_> = engine.outbound().sent.iter().map(|e| e.event).collect();
    assert_eq!(events, vec![OutboundEvent::Join, OutboundEvent::Msg]);
    assert_eq!(engine.outbound().sent[0].content, "7");
    assert_eq!(*log.lock().unwrap(), vec!["transmit:JOIN", "append:hi", "transmit:MSG"]);
}

#[test]
fn open_without_focus_transmits_nothing() {
    let (mut engine, _log) = engine_with(SyncOptions::default());

    engine.on_open();

    assert!(engine.outbound().sent.is_empty());
}

#[test]
fn leave_clears_focus_and_announces() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();

    engine.leave_conversation().unwrap();

    assert!(engine.focused().is_none());
    assert_eq!(engine.outbound().sent.last().unwrap().event, OutboundEvent::Left);
}

#[test]
fn history_classifies_authorship_and_admits_unread_own() {
    let mut engine = open_engine();
    let peer = PeerId::from("7");
    engine.join_conversation(peer.clone()).unwrap();

    let applied = engine.apply_history(
        &peer,
        vec![
            msg("42", "7", "mine read", true),
            msg("7", "42", "theirs", false),
            msg("42", "7", "mine unread", false),
        ],
    );

    assert!(applied);
    let ui = engine.presentation();
    assert_eq!(ui.cleared, vec![peer]);
    assert_eq!(ui.statuses, vec![DeliveryStatus::Read, DeliveryStatus::Received, DeliveryStatus::Sent]);
    assert_eq!(engine.awaiting_read_count(), 1);

    engine.on_frame(r#"{"event":"READ"}"#);
    assert_eq!(engine.presentation().status(2), DeliveryStatus::Read);
}

#[test]
fn stale_history_is_discarded() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();
    engine.join_conversation(PeerId::from("8")).unwrap();

    let applied = engine.apply_history(&PeerId::from("7"), vec![msg("7", "42", "old", false)]);

    assert!(!applied);
    assert!(engine.presentation().messages.is_empty());
    assert!(engine.presentation().cleared.is_empty());
}

#[test]
fn inbound_message_renders_only_in_focused_conversation() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();

    let frame = |chat: &str, content: &str| {
        json!({
            "event": "MSG",
            "tag": "",
            "payload": {
                "chat_id": chat,
                "sender_id": chat,
                "receiver_id": "42",
                "content": content,
                "read_at": "2024-02-22T03:07:00Z",
                "author": false
            }
        })
        .to_string()
    };

    engine.on_frame(&frame("7", "from seven"));
    engine.on_frame(&frame("8", "from eight"));

    let ui = engine.presentation();
    assert_eq!(ui.messages.len(), 1);
    assert_eq!(ui.messages[0].content, "from seven");
    assert_eq!(ui.statuses[0], DeliveryStatus::Received);
    assert_eq!(engine.awaiting_read_count(), 0);
}

#[test]
fn unresolved_tag_falls_back_to_receiver_gate() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();

    engine.on_frame(&ack_frame("never-sent", "stray", "42", false));
    assert!(engine.presentation().messages.is_empty());

    engine.on_frame(
        r#"{"event":"MSG","tag":"never-sent","payload":{"sender_id":"42","receiver_id":"7","content":"echo"}}"#,
    );
    let ui = engine.presentation();
    assert_eq!(ui.messages.len(), 1);
    assert_eq!(ui.statuses[0], DeliveryStatus::Sent);
    assert_eq!(engine.awaiting_read_count(), 1);
}

#[test]
fn expired_pending_fails_and_late_ack_is_treated_as_new() {
    let mut engine = open_engine();
    engine.join_conversation(PeerId::from("7")).unwrap();
    let tag = engine.send("slow").unwrap();

    assert_eq!(engine.expire_pending(Instant::now()), 0);
    let expired = engine.expire_pending(Instant::now() + Duration::from_secs(31));

    assert_eq!(expired, 1);
    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.presentation().status(0), DeliveryStatus::Failed);

    let late = json!({
        "event": "MSG",
        "tag": tag.as_str(),
        "payload": { "sender_id": "42", "receiver_id": "7", "content": "slow" }
    });
    engine.on_frame(&late.to_string());

    let ui = engine.presentation();
    assert_eq!(ui.status(0), DeliveryStatus::Failed);
    assert_eq!(ui.messages.len(), 2);
    assert_eq!(ui.status(1), DeliveryStatus::Sent);
}

#[test]
fn expiry_disabled_keeps_pending_forever() {
    let (mut engine, _log) = engine_with(SyncOptions {
        pending_ttl: None,
        ..Default::default()
    });
    engine.on_open();
    engine.send("forever").unwrap();

    assert_eq!(engine.expire_pending(Instant::now() + Duration::from_secs(86_400)), 0);
    assert_eq!(engine.pending_count(), 1);
}

#[test]
fn transmit_failure_withdraws_pending_send() {
    let (mut engine, _log) = engine_with(SyncOptions::default());
    engine.on_open();
    engine.send("ok").unwrap();
    engine.outbound_mut().fail = true;

    let err = engine.send("lost").expect_err("must fail");

    assert_eq!(err.client_code().as_str(), "TRANSPORT");
    assert_eq!(engine.presentation().status(0), DeliveryStatus::Sending);
    assert_eq!(engine.presentation().status(1), DeliveryStatus::Failed);
    assert_eq!(engine.pending_count(), 1);
}

#[test]
fn malformed_and_unknown_frames_are_dropped() {
    let (mut engine, log) = engine_with(SyncOptions::default());
    engine.on_open();
    engine.send("hi").unwrap();
    log.lock().unwrap().clear();

    engine.on_frame("not json");
    engine.on_frame(r#"{"event":"MSG"}"#);
    engine.on_frame(r#"{"event":"TYPING","payload":{"user_id":"7"}}"#);
    engine.on_frame(r#"{"event":"CONN"}"#);

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(engine.pending_count(), 1);
}

#[test]
fn closed_is_terminal() {
    let (mut engine, _log) = engine_with(SyncOptions::default());
    engine.on_close();
    engine.on_open();

    assert_eq!(engine.connection(), ConnectionState::Closed);
    assert_eq!(engine.presentation().connection, vec![ConnectionState::Closed]);
}
