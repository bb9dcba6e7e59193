use chatsync_core::model::PeerId;

struct AwaitingRead<H> {
    peer: Option<PeerId>,
    handle: H,
}

/// Focused conversation plus the queue of self-sent messages awaiting a read
/// acknowledgment.
///
/// The queue spans conversations: changing focus neither partitions nor
/// clears it.
pub struct ConversationState<H> {
    focused: Option<PeerId>,
    awaiting_read: Vec<AwaitingRead<H>>,
}

impl<H> ConversationState<H> {
    pub fn new() -> Self {
        Self {
            focused: None,
            awaiting_read: Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<&PeerId> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, peer: &PeerId) -> bool {
        self.focused.as_ref() == Some(peer)
    }

    pub fn focus(&mut self, peer: PeerId) {
        self.focused = Some(peer);
    }

    pub fn clear_focus(&mut self) -> Option<PeerId> {
        self.focused.take()
    }

    /// Admit a handle for an own message that is not yet read.
    pub fn admit(&mut self, peer: Option<PeerId>, handle: H) {
        self.awaiting_read.push(AwaitingRead { peer, handle });
    }

    pub fn awaiting_len(&self) -> usize {
        self.awaiting_read.len()
    }

    /// Take every awaiting handle.
    pub fn drain_all(&mut self) -> Vec<H> {
        self.awaiting_read.drain(..).map(|a| a.handle).collect()
    }

    /// Take the handles of messages sent to `peer`; others stay queued.
    pub fn drain_peer(&mut self, peer: &PeerId) -> Vec<H> {
        let (hit, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.awaiting_read)
            .into_iter()
            .partition(|a| a.peer.as_ref() == Some(peer));
        self.awaiting_read = keep;
        hit.into_iter().map(|a| a.handle).collect()
    }
}

impl<H> Default for ConversationState<H> {
    fn default() -> Self {
        Self::new()
    }
}
