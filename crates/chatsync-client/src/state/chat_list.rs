use std::collections::HashMap;

use chatsync_core::model::{PeerId, SummaryRecord};

/// Running summary of one conversation in the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub peer_id: PeerId,
    pub preview: String,
    pub unread_count: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl ConversationSummary {
    /// Seed from an authoritative snapshot record.
    pub fn from_snapshot(rec: SummaryRecord) -> Self {
        Self {
            peer_id: rec.user_id,
            preview: rec.content,
            unread_count: rec.unread_messages,
            first_name: rec.first_name,
            last_name: rec.last_name,
            profile_image_url: rec.profile_image_url,
        }
    }

    /// Merge a CHATS delta: zero resets the unread counter, anything else adds
    /// to it; the preview only changes when the delta carries content.
    pub fn merge(&mut self, delta: &SummaryRecord) {
        if delta.unread_messages == 0 {
            self.unread_count = 0;
        } else {
            self.unread_count = self.unread_count.saturating_add(delta.unread_messages);
        }
        if !delta.content.is_empty() {
            self.preview = delta.content.clone();
        }
    }
}

struct ChatEntry<R> {
    summary: ConversationSummary,
    row: R,
}

/// Chat list aggregate: peer -> summary + presentation row.
pub struct ChatList<R> {
    entries: HashMap<PeerId, ChatEntry<R>>,
}

impl<R> ChatList<R> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Full replace from a snapshot. Prior counters are discarded.
    pub fn replace(&mut self, seeded: impl IntoIterator<Item = (ConversationSummary, R)>) {
        self.entries.clear();
        for (summary, row) in seeded {
            self.entries
                .insert(summary.peer_id.clone(), ChatEntry { summary, row });
        }
    }

    /// Apply a delta to an existing summary. Unknown peers are not created.
    pub fn apply(&mut self, delta: &SummaryRecord) -> Option<(&ConversationSummary, &R)> {
        let entry = self.entries.get_mut(&delta.user_id)?;
        entry.summary.merge(delta);
        Some((&entry.summary, &entry.row))
    }

    pub fn get(&self, peer: &PeerId) -> Option<&ConversationSummary> {
        self.entries.get(peer).map(|e| &e.summary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for ChatList<R> {
    fn default() -> Self {
        Self::new()
    }
}
