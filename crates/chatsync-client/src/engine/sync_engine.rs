use std::time::{Duration, Instant};

use chrono::Utc;

use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::model::{DeliveryStatus, Message, PeerId, SummaryRecord, Tag};
use chatsync_core::protocol::{decode_inbound, InboundEvent, OutboundEnvelope};

use crate::config::{ReadScope, SyncSection};
use crate::dispatch::Dispatcher;
use crate::engine::ports::{ConnectionState, Outbound, Presentation};
use crate::state::{ConversationSummary, PendingSend, SyncState};

/// Engine tunables.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// `None` retains pending sends until acknowledged.
    pub pending_ttl: Option<Duration>,
    pub read_scope: ReadScope,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&SyncSection::default())
    }
}

impl From<&SyncSection> for SyncOptions {
    fn from(s: &SyncSection) -> Self {
        Self {
            pending_ttl: s.pending_ttl(),
            read_scope: s.read_scope,
        }
    }
}

/// Top-level sync engine for one connection.
pub struct SyncEngine<P: Presentation, O: Outbound> {
    connection: ConnectionState,
    state: SyncState<P::Handle, P::Row>,
    dispatcher: Dispatcher,
    presentation: P,
    outbound: O,
    pending_ttl: Option<Duration>,
}

impl<P: Presentation, O: Outbound> SyncEngine<P, O> {
    pub fn new(presentation: P, outbound: O, opts: SyncOptions) -> Self {
        Self {
            connection: ConnectionState::Connecting,
            state: SyncState::new(),
            dispatcher: Dispatcher::new(opts.read_scope),
            presentation,
            outbound,
            pending_ttl: opts.pending_ttl,
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn focused(&self) -> Option<&PeerId> {
        self.state.conversation.focused()
    }

    pub fn pending_count(&self) -> usize {
        self.state.correlations.len()
    }

    pub fn awaiting_read_count(&self) -> usize {
        self.state.conversation.awaiting_len()
    }

    pub fn summary(&self, peer: &PeerId) -> Option<&ConversationSummary> {
        self.state.chat_list.get(peer)
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn outbound(&self) -> &O {
        &self.outbound
    }

    pub fn outbound_mut(&mut self) -> &mut O {
        &mut self.outbound
    }

    // --------------------
    // Connection lifecycle
    // --------------------

    /// Handshake succeeded. A conversation focused while connecting is
    /// announced now, before any MSG can go out.
    pub fn on_open(&mut self) {
        match self.connection {
            ConnectionState::Connecting => {
                self.set_connection(ConnectionState::Open);
                if let Some(peer) = self.state.conversation.focused().cloned() {
                    tracing::debug!(%peer, "transmitting deferred JOIN");
                    if let Err(e) = self
                        .outbound
                        .transmit(&OutboundEnvelope::join(&peer, Utc::now()))
                    {
                        tracing::warn!(%peer, error = %e, "deferred JOIN transmit failed");
                    }
                }
            }
            ConnectionState::Open => {}
            ConnectionState::Closed => {
                tracing::warn!("open signal after close ignored; closed is terminal");
            }
        }
    }

    /// Socket terminated or handshake failed.
    pub fn on_close(&mut self) {
        if self.connection != ConnectionState::Closed {
            self.set_connection(ConnectionState::Closed);
        }
    }

    fn set_connection(&mut self, next: ConnectionState) {
        tracing::info!(from = self.connection.as_str(), to = next.as_str(), "connection state");
        self.connection = next;
        self.presentation.on_connection_state_changed(next);
    }

    // --------------------
    // Outbound actions
    // --------------------

    /// Send a message with optimistic display. Returns the correlation tag.
    pub fn send(&mut self, content: &str) -> Result<Tag> {
        if self.connection != ConnectionState::Open {
            tracing::debug!(state = self.connection.as_str(), "send rejected");
            return Err(ChatSyncError::Disconnected);
        }
        if content.is_empty() {
            return Err(ChatSyncError::EmptyContent);
        }

        let sent_at = Utc::now();
        let tag = Tag::generate();
        let peer = self.state.conversation.focused().cloned();

        let provisional = Message::provisional(content, sent_at, peer.clone());
        let handle = self
            .presentation
            .on_message_appended(&provisional, DeliveryStatus::Sending);

        let pending = PendingSend {
            handle: handle.clone(),
            peer,
        };
        if let Err(e) = self.state.correlations.register(tag.clone(), pending) {
            self.presentation
                .on_message_status_changed(&handle, DeliveryStatus::Failed);
            return Err(e);
        }

        let envelope = OutboundEnvelope::message(content, sent_at, tag.clone());
        if let Err(e) = self.outbound.transmit(&envelope) {
            tracing::warn!(%tag, error = %e, "transmit failed; withdrawing pending send");
            self.state.correlations.resolve(&tag);
            self.presentation
                .on_message_status_changed(&handle, DeliveryStatus::Failed);
            return Err(e);
        }

        tracing::debug!(%tag, "message sent");
        Ok(tag)
    }

    /// Focus `peer` and announce it to the backend. History is applied
    /// separately via [`Self::apply_history`] once fetched.
    ///
    /// Pending correlations and the awaiting-read queue are left untouched.
    pub fn join_conversation(&mut self, peer: PeerId) -> Result<()> {
        tracing::info!(%peer, "joining conversation");
        self.state.conversation.focus(peer.clone());

        if self.connection != ConnectionState::Open {
            tracing::debug!(%peer, state = self.connection.as_str(), "JOIN deferred until open");
            return Ok(());
        }
        self.outbound
            .transmit(&OutboundEnvelope::join(&peer, Utc::now()))
    }

    /// Drop focus and tell the backend we left.
    pub fn leave_conversation(&mut self) -> Result<()> {
        let Some(peer) = self.state.conversation.clear_focus() else {
            return Ok(());
        };
        tracing::info!(%peer, "leaving conversation");

        if self.connection != ConnectionState::Open {
            return Ok(());
        }
        self.outbound.transmit(&OutboundEnvelope::left(Utc::now()))
    }

    // --------------------
    // Fetch completions
    // --------------------

    /// Repopulate the message pane from fetched history. Returns `false` when
    /// the focus has moved on and the response is stale.
    pub fn apply_history(&mut self, peer: &PeerId, messages: Vec<Message>) -> bool {
        if !self.state.conversation.is_focused(peer) {
            tracing::debug!(%peer, "stale history response discarded");
            return false;
        }

        self.presentation.on_conversation_cleared(peer);
        for message in &messages {
            if message.authored_by_self(peer) {
                let handle = self
                    .presentation
                    .on_message_appended(message, DeliveryStatus::for_own(message.read_at));
                if !message.is_read() {
                    self.state.conversation.admit(Some(peer.clone()), handle);
                }
            } else {
                self.presentation
                    .on_message_appended(message, DeliveryStatus::Received);
            }
        }
        tracing::debug!(%peer, count = messages.len(), "history applied");
        true
    }

    /// Replace the chat list from an authoritative snapshot.
    pub fn apply_conversation_list(&mut self, records: Vec<SummaryRecord>) {
        let summaries: Vec<ConversationSummary> = records
            .into_iter()
            .map(ConversationSummary::from_snapshot)
            .collect();

        let rows = self.presentation.on_conversation_list_replaced(&summaries);
        if rows.len() != summaries.len() {
            tracing::warn!(
                summaries = summaries.len(),
                rows = rows.len(),
                "presentation returned mismatched row count; extra summaries untracked"
            );
        }

        self.state.chat_list.replace(summaries.into_iter().zip(rows));
        tracing::debug!(count = self.state.chat_list.len(), "conversation list replaced");
    }

    // --------------------
    // Inbound
    // --------------------

    /// Decode one text frame and dispatch it. Malformed frames are dropped.
    pub fn on_frame(&mut self, frame: &str) {
        match decode_inbound(frame) {
            Ok(event) => self.on_envelope(event),
            Err(e) => tracing::warn!(error = %e, "dropping malformed envelope"),
        }
    }

    pub fn on_envelope(&mut self, event: InboundEvent) {
        tracing::trace!(kind = event.kind(), "inbound");
        self.dispatcher
            .dispatch(&mut self.state, &mut self.presentation, event);
    }

    // --------------------
    // Expiry
    // --------------------

    /// Evict pending sends older than the TTL and mark them failed.
    pub fn expire_pending(&mut self, now: Instant) -> usize {
        let Some(ttl) = self.pending_ttl else {
            return 0;
        };

        let evicted = self.state.correlations.evict_expired(now, ttl);
        for (tag, pending) in &evicted {
            tracing::warn!(%tag, "acknowledgment never arrived; pending send expired");
            self.presentation
                .on_message_status_changed(&pending.handle, DeliveryStatus::Failed);
        }
        evicted.len()
    }
}
