//! Sync state owned by one engine instance.
//!
//! Correlation table, conversation focus + awaiting-read queue, and the chat
//! list aggregate. Nothing here is global: every engine carries its own
//! `SyncState`, so independent sessions never share pending work.

mod chat_list;
mod conversation;
mod correlation;

pub use chat_list::{ChatList, ConversationSummary};
pub use conversation::ConversationState;
pub use correlation::CorrelationTable;

use chatsync_core::model::PeerId;

/// Context registered for an in-flight MSG send.
#[derive(Debug, Clone)]
pub struct PendingSend<H> {
    /// Display handle of the optimistic message.
    pub handle: H,
    /// Conversation focused when the message was sent.
    pub peer: Option<PeerId>,
}

pub struct SyncState<H, R> {
    pub correlations: CorrelationTable<PendingSend<H>>,
    pub conversation: ConversationState<H>,
    pub chat_list: ChatList<R>,
}

impl<H, R> SyncState<H, R> {
    pub fn new() -> Self {
        Self {
            correlations: CorrelationTable::new(),
            conversation: ConversationState::new(),
            chat_list: ChatList::new(),
        }
    }
}

impl<H, R> Default for SyncState<H, R> {
    fn default() -> Self {
        Self::new()
    }
}
