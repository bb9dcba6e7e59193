//! Server -> client envelope.
//!
//! The raw envelope keeps `payload` as `RawValue` so only the event kind is
//! parsed up front; the payload is then decoded into the shape that kind
//! requires.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{ChatSyncError, Result};
use crate::model::{Message, PeerId, SummaryRecord, Tag};

/// Inbound envelope as it arrives on the wire.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    /// Event kind (`MSG`, `READ`, `CHATS`, `CONN`, ...).
    pub event: String,
    /// Echo of the client tag; empty or absent for peer-originated traffic.
    #[serde(default)]
    pub tag: Option<String>,
    /// Kind-specific payload, parsed lazily.
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

/// READ signal. The backend may name the conversation that was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReadSignal {
    #[serde(default, alias = "chatId")]
    pub chat_id: Option<PeerId>,
    #[serde(default, alias = "readAt")]
    pub read_at: Option<DateTime<Utc>>,
}

/// Decoded inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// MSG: either the acknowledgment of our send (tag resolves) or a new
    /// message from a peer.
    Message { tag: Option<Tag>, message: Message },
    /// READ: outstanding self-sent messages were read.
    ReadBatch(ReadSignal),
    /// CHATS: conversation summary delta.
    SummaryUpdate(SummaryRecord),
    /// CONN: backend accepted the session.
    Connected,
    /// Any other event kind; ignored for forward compatibility.
    Unknown(String),
}

impl InboundEvent {
    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::Message { .. } => "MSG",
            InboundEvent::ReadBatch(_) => "READ",
            InboundEvent::SummaryUpdate(_) => "CHATS",
            InboundEvent::Connected => "CONN",
            InboundEvent::Unknown(kind) => kind,
        }
    }
}

/// Decode a text frame into an [`InboundEvent`].
pub fn decode_inbound(frame: &str) -> Result<InboundEvent> {
    let raw: RawEnvelope = serde_json::from_str(frame)
        .map_err(|e| ChatSyncError::Malformed(format!("invalid envelope json: {e}")))?;
    InboundEvent::try_from(raw)
}

impl TryFrom<RawEnvelope> for InboundEvent {
    type Error = ChatSyncError;

    fn try_from(raw: RawEnvelope) -> Result<Self> {
        match raw.event.as_str() {
            "MSG" => {
                let message: Message = required_payload(&raw, "MSG")?;
                let tag = raw.tag.filter(|t| !t.is_empty()).map(Tag::from);
                Ok(InboundEvent::Message { tag, message })
            }
            "READ" => {
                let signal = match raw.payload.as_deref() {
                    Some(p) => parse_payload::<ReadSignal>(p, "READ")?,
                    None => ReadSignal::default(),
                };
                Ok(InboundEvent::ReadBatch(signal))
            }
            "CHATS" => Ok(InboundEvent::SummaryUpdate(required_payload(&raw, "CHATS")?)),
            "CONN" => Ok(InboundEvent::Connected),
            _ => Ok(InboundEvent::Unknown(raw.event)),
        }
    }
}

fn required_payload<T: DeserializeOwned>(raw: &RawEnvelope, kind: &str) -> Result<T> {
    let payload = raw
        .payload
        .as_deref()
        .ok_or_else(|| ChatSyncError::Malformed(format!("{kind} requires payload")))?;
    parse_payload(payload, kind)
}

fn parse_payload<T: DeserializeOwned>(payload: &RawValue, kind: &str) -> Result<T> {
    serde_json::from_str(payload.get())
        .map_err(|e| ChatSyncError::Malformed(format!("{kind} invalid payload: {e}")))
}
