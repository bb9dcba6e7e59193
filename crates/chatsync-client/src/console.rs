//! Headless console front end: a presentation that renders through
//! `tracing`, and the stdin command parser.
//!
//! Handles are sequential message ids; chat list rows are the peer ids.

use std::collections::HashMap;

use chatsync_core::model::{DeliveryStatus, Message, PeerId};

use crate::engine::{ConnectionState, Presentation};
use crate::state::ConversationSummary;

#[derive(Debug, Default)]
pub struct ConsolePresentation {
    next_id: u64,
    statuses: HashMap<u64, DeliveryStatus>,
}

impl ConsolePresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: u64) -> Option<DeliveryStatus> {
        self.statuses.get(&id).copied()
    }
}

impl Presentation for ConsolePresentation {
    type Handle = u64;
    type Row = PeerId;

    fn on_message_appended(&mut self, message: &Message, status: DeliveryStatus) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.statuses.insert(id, status);
        tracing::info!(
            id,
            from = %message.sender_id,
            status = status.as_str(),
            attachment = ?message.attachment(),
            "{}",
            message.content
        );
        id
    }

    fn on_message_status_changed(&mut self, handle: &u64, status: DeliveryStatus) {
        self.statuses.insert(*handle, status);
        tracing::info!(id = handle, status = status.as_str(), "message status");
    }

    fn on_message_sender_resolved(&mut self, handle: &u64, sender_id: &PeerId) {
        tracing::debug!(id = handle, sender = %sender_id, "sender resolved");
    }

    fn on_conversation_cleared(&mut self, peer: &PeerId) {
        self.statuses.clear();
        tracing::info!(%peer, "---- conversation ----");
    }

    fn on_conversation_list_replaced(&mut self, summaries: &[ConversationSummary]) -> Vec<PeerId> {
        for s in summaries {
            tracing::info!(peer = %s.peer_id, unread = s.unread_count, "{}", s.preview);
        }
        summaries.iter().map(|s| s.peer_id.clone()).collect()
    }

    fn on_summary_updated(&mut self, row: &PeerId, summary: &ConversationSummary) {
        tracing::info!(peer = %row, unread = summary.unread_count, "{}", summary.preview);
    }

    fn on_connection_state_changed(&mut self, state: ConnectionState) {
        tracing::info!(state = state.as_str(), "connection");
    }
}

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Blank line.
    Empty,
    /// Message text, sent verbatim.
    Send(String),
    Join(PeerId),
    Leave,
    RefreshConversations,
    Quit,
    /// Recognized command with bad arguments; carries the usage string.
    Usage(&'static str),
}

/// Parse a stdin line. Commands are matched on the trimmed line; anything
/// else is message text and keeps its whitespace.
pub fn parse_line(line: &str) -> ConsoleCommand {
    let cmd = line.trim();
    match cmd {
        "" => ConsoleCommand::Empty,
        "/quit" => ConsoleCommand::Quit,
        "/leave" => ConsoleCommand::Leave,
        "/chats" => ConsoleCommand::RefreshConversations,
        _ => match cmd.strip_prefix("/join") {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                match rest.trim() {
                    "" => ConsoleCommand::Usage("/join <peer>"),
                    peer => ConsoleCommand::Join(PeerId::from(peer)),
                }
            }
            _ => ConsoleCommand::Send(line.to_string()),
        },
    }
}
