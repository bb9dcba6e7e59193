//! Recording doubles for the presentation and transport ports.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chatsync_client::engine::{ConnectionState, DataSource, Outbound, Presentation, SyncEngine, SyncOptions};
use chatsync_client::state::ConversationSummary;
use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::model::{DeliveryStatus, Message, PeerId, SummaryRecord};
use chatsync_core::protocol::OutboundEnvelope;

/// Shared, ordered trace of every port interaction.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
pub struct RecordingPresentation {
    pub log: CallLog,
    pub messages: Vec<Message>,
    pub statuses: Vec<DeliveryStatus>,
    pub senders: Vec<Option<PeerId>>,
    pub cleared: Vec<PeerId>,
    pub summary_updates: Vec<(PeerId, ConversationSummary)>,
    pub connection: Vec<ConnectionState>,
}

impl RecordingPresentation {
    pub fn status(&self, handle: usize) -> DeliveryStatus {
        self.statuses[handle]
    }
}

impl Presentation for RecordingPresentation {
    type Handle = usize;
    type Row = PeerId;

    fn on_message_appended(&mut self, message: &Message, status: DeliveryStatus) -> usize {
        self.log.lock().unwrap().push(format!("append:{}", message.content));
        self.messages.push(message.clone());
        self.statuses.push(status);
        self.senders.push(None);
        self.messages.len() - 1
    }

    fn on_message_status_changed(&mut self, handle: &usize, status: DeliveryStatus) {
        self.log
            .lock()
            .unwrap()
            .push(format!("status:{handle}:{}", status.as_str()));
        self.statuses[*handle] = status;
    }

    fn on_message_sender_resolved(&mut self, handle: &usize, sender_id: &PeerId) {
        self.senders[*handle] = Some(sender_id.clone());
    }

    fn on_conversation_cleared(&mut self, peer: &PeerId) {
        self.log.lock().unwrap().push(format!("cleared:{peer}"));
        self.cleared.push(peer.clone());
    }

    fn on_conversation_list_replaced(&mut self, summaries: &[ConversationSummary]) -> Vec<PeerId> {
        self.log
            .lock()
            .unwrap()
            .push(format!("list:{}", summaries.len()));
        summaries.iter().map(|s| s.peer_id.clone()).collect()
    }

    fn on_summary_updated(&mut self, row: &PeerId, summary: &ConversationSummary) {
        self.log.lock().unwrap().push(format!("summary:{row}"));
        self.summary_updates.push((row.clone(), summary.clone()));
    }

    fn on_connection_state_changed(&mut self, state: ConnectionState) {
        self.connection.push(state);
    }
}

#[derive(Default)]
pub struct RecordingOutbound {
    pub log: CallLog,
    pub sent: Vec<OutboundEnvelope>,
    pub fail: bool,
}

impl Outbound for RecordingOutbound {
    fn transmit(&mut self, envelope: &OutboundEnvelope) -> Result<()> {
        if self.fail {
            return Err(ChatSyncError::Transport("link down".into()));
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("transmit:{}", envelope.event.as_str()));
        self.sent.push(envelope.clone());
        Ok(())
    }
}

pub type TestEngine = SyncEngine<RecordingPresentation, RecordingOutbound>;

/// Engine with both doubles sharing one call log.
pub fn engine_with(opts: SyncOptions) -> (TestEngine, CallLog) {
    let log = CallLog::default();
    let ui = RecordingPresentation {
        log: Arc::clone(&log),
        ..Default::default()
    };
    let out = RecordingOutbound {
        log: Arc::clone(&log),
        ..Default::default()
    };
    (SyncEngine::new(ui, out, opts), log)
}

pub fn open_engine() -> TestEngine {
    let (mut engine, _log) = engine_with(SyncOptions::default());
    engine.on_open();
    engine
}

/// In-memory data source with canned responses.
#[derive(Default)]
pub struct StaticDataSource {
    pub history: Vec<Message>,
    pub conversations: Vec<SummaryRecord>,
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_history(&self, peer: &PeerId) -> Result<Vec<Message>> {
        Ok(self
            .history
            .iter()
            .filter(|m| m.receiver_id == *peer || m.sender_id == *peer)
            .cloned()
            .collect())
    }

    async fn fetch_conversations(&self) -> Result<Vec<SummaryRecord>> {
        Ok(self.conversations.clone())
    }
}

pub fn msg(from: &str, to: &str, content: &str, read: bool) -> Message {
    Message {
        sender_id: PeerId::from(from),
        receiver_id: PeerId::from(to),
        content: content.to_string(),
        sent_at: Some(chrono::Utc::now()),
        read_at: read.then(chrono::Utc::now),
        message_id: Some(format!("m-{content}")),
        chat_id: None,
        author: None,
        attachment: None,
    }
}
