use async_trait::async_trait;

use chatsync_core::error::Result;
use chatsync_core::model::{DeliveryStatus, Message, PeerId, SummaryRecord};
use chatsync_core::protocol::OutboundEnvelope;

use crate::state::ConversationSummary;

/// Connection lifecycle. `Closed` is terminal for an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

/// Rendering layer callbacks. These are the only mutation points the engine
/// exposes to the UI.
pub trait Presentation: Send {
    /// Opaque handle to a displayed message.
    type Handle: Clone + Send + 'static;
    /// Opaque handle to a chat list row.
    type Row: Send + 'static;

    fn on_message_appended(&mut self, message: &Message, status: DeliveryStatus) -> Self::Handle;

    fn on_message_status_changed(&mut self, handle: &Self::Handle, status: DeliveryStatus);

    /// Server-confirmed sender id for an optimistic message.
    fn on_message_sender_resolved(&mut self, _handle: &Self::Handle, _sender_id: &PeerId) {}

    /// Message pane is about to be repopulated with `peer`'s history.
    fn on_conversation_cleared(&mut self, peer: &PeerId);

    /// Chat list replaced; must return one row per summary, in order.
    fn on_conversation_list_replaced(&mut self, summaries: &[ConversationSummary]) -> Vec<Self::Row>;

    fn on_summary_updated(&mut self, row: &Self::Row, summary: &ConversationSummary);

    fn on_connection_state_changed(&mut self, _state: ConnectionState) {}
}

/// Outbound half of the transport.
pub trait Outbound: Send {
    fn transmit(&mut self, envelope: &OutboundEnvelope) -> Result<()>;
}

/// Request/response source for history and the conversation list.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_history(&self, peer: &PeerId) -> Result<Vec<Message>>;
    async fn fetch_conversations(&self) -> Result<Vec<SummaryRecord>>;
}
