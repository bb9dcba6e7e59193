use chatsync_core::model::{DeliveryStatus, Message, SummaryRecord, Tag};
use chatsync_core::protocol::{InboundEvent, ReadSignal};

use crate::config::ReadScope;
use crate::engine::Presentation;
use crate::state::SyncState;

/// Inbound event router. Stateless apart from the READ scoping policy; all
/// mutable state is passed in by the owning engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    read_scope: ReadScope,
}

impl Dispatcher {
    pub fn new(read_scope: ReadScope) -> Self {
        Self { read_scope }
    }

    pub fn read_scope(&self) -> ReadScope {
        self.read_scope
    }

    pub fn dispatch<P: Presentation>(
        &self,
        state: &mut SyncState<P::Handle, P::Row>,
        ui: &mut P,
        event: InboundEvent,
    ) {
        match event {
            InboundEvent::Message { tag, message } => self.on_message(state, ui, tag, message),
            InboundEvent::ReadBatch(signal) => self.on_read(state, ui, signal),
            InboundEvent::SummaryUpdate(delta) => self.on_summary(state, ui, delta),
            InboundEvent::Connected => tracing::debug!("backend accepted session"),
            InboundEvent::Unknown(kind) => tracing::trace!(%kind, "unknown event kind ignored"),
        }
    }

    fn on_message<P: Presentation>(
        &self,
        state: &mut SyncState<P::Handle, P::Row>,
        ui: &mut P,
        tag: Option<Tag>,
        message: Message,
    ) {
        if let Some(pending) = tag.as_ref().and_then(|t| state.correlations.resolve(t)) {
            let status = DeliveryStatus::for_own(message.read_at);
            tracing::debug!(tag = ?tag, status = status.as_str(), "send acknowledged");
            ui.on_message_status_changed(&pending.handle, status);
            ui.on_message_sender_resolved(&pending.handle, &message.sender_id);
            if !message.is_read() {
                state.conversation.admit(pending.peer, pending.handle);
            }
            return;
        }

        let Some(focused) = state.conversation.focused().cloned() else {
            tracing::debug!("inbound message with no focused conversation; left to chat list");
            return;
        };
        if message.conversation() != Some(&focused) {
            tracing::debug!(peer = %focused, "inbound message outside focused conversation");
            return;
        }

        if message.authored_by_self(&focused) {
            let handle = ui.on_message_appended(&message, DeliveryStatus::for_own(message.read_at));
            if !message.is_read() {
                state.conversation.admit(Some(focused), handle);
            }
        } else {
            ui.on_message_appended(&message, DeliveryStatus::Received);
        }
    }

    fn on_read<P: Presentation>(
        &self,
        state: &mut SyncState<P::Handle, P::Row>,
        ui: &mut P,
        signal: ReadSignal,
    ) {
        let handles = match (self.read_scope, signal.chat_id.as_ref()) {
            (ReadScope::PerPeer, Some(peer)) => state.conversation.drain_peer(peer),
            _ => state.conversation.drain_all(),
        };
        tracing::debug!(marked = handles.len(), "read batch");
        for handle in &handles {
            ui.on_message_status_changed(handle, DeliveryStatus::Read);
        }
    }

    fn on_summary<P: Presentation>(
        &self,
        state: &mut SyncState<P::Handle, P::Row>,
        ui: &mut P,
        delta: SummaryRecord,
    ) {
        match state.chat_list.apply(&delta) {
            Some((summary, row)) => ui.on_summary_updated(row, summary),
            None => tracing::debug!(peer = %delta.user_id, "summary update for unknown conversation"),
        }
    }
}
