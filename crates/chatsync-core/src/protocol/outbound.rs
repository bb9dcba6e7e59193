//! Client -> server envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ChatSyncError, Result};
use crate::model::{PeerId, Tag};

/// Event kinds the client emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutboundEvent {
    #[serde(rename = "MSG")]
    Msg,
    #[serde(rename = "JOIN")]
    Join,
    #[serde(rename = "LEFT")]
    Left,
}

impl OutboundEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            OutboundEvent::Msg => "MSG",
            OutboundEvent::Join => "JOIN",
            OutboundEvent::Left => "LEFT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEnvelope {
    pub event: OutboundEvent,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub tag: Tag,
}

impl OutboundEnvelope {
    pub fn message(content: impl Into<String>, sent_at: DateTime<Utc>, tag: Tag) -> Self {
        Self {
            event: OutboundEvent::Msg,
            content: content.into(),
            sent_at,
            tag,
        }
    }

    /// JOIN carries the peer id as content.
    pub fn join(peer: &PeerId, sent_at: DateTime<Utc>) -> Self {
        Self {
            event: OutboundEvent::Join,
            content: peer.as_str().to_string(),
            sent_at,
            tag: Tag::generate(),
        }
    }

    pub fn left(sent_at: DateTime<Utc>) -> Self {
        Self {
            event: OutboundEvent::Left,
            content: String::new(),
            sent_at,
            tag: Tag::generate(),
        }
    }

    /// Serialize to a text frame.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ChatSyncError::Internal(format!("json encode failed: {e}")))
    }
}
