use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::model::Tag;

struct PendingEntry<C> {
    context: C,
    registered_at: Instant,
}

/// Correlation table: `tag -> pending context` for in-flight outbound actions.
///
/// Each tag is registered once and consumed at most once; `register` and
/// `resolve` are atomic per tag even when the table is shared.
pub struct CorrelationTable<C> {
    entries: DashMap<Tag, PendingEntry<C>>,
}

impl<C> CorrelationTable<C> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn register(&self, tag: Tag, context: C) -> Result<()> {
        self.register_at(tag, context, Instant::now())
    }

    /// Register with an explicit registration instant (expiry is measured from it).
    pub fn register_at(&self, tag: Tag, context: C, now: Instant) -> Result<()> {
        match self.entries.entry(tag) {
            Entry::Occupied(e) => {
                tracing::warn!(tag = %e.key(), "correlation tag already pending; ignored");
                Err(ChatSyncError::DuplicateTag(e.key().to_string()))
            }
            Entry::Vacant(e) => {
                e.insert(PendingEntry {
                    context,
                    registered_at: now,
                });
                Ok(())
            }
        }
    }

    /// Remove and return the context for `tag`. `None` means not found
    /// (never registered, already resolved, or expired).
    pub fn resolve(&self, tag: &Tag) -> Option<C> {
        self.entries.remove(tag).map(|(_, entry)| entry.context)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry registered at least `ttl` before `now`.
    pub fn evict_expired(&self, now: Instant, ttl: Duration) -> Vec<(Tag, C)> {
        let stale: Vec<Tag> = self
            .entries
            .iter()
            .filter(|e| now.saturating_duration_since(e.value().registered_at) >= ttl)
            .map(|e| e.key().clone())
            .collect();

        stale
            .into_iter()
            .filter_map(|tag| self.entries.remove(&tag))
            .map(|(tag, entry)| (tag, entry.context))
            .collect()
    }
}

impl<C> Default for CorrelationTable<C> {
    fn default() -> Self {
        Self::new()
    }
}
