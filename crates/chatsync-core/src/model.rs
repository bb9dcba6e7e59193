//! Domain records carried inside envelopes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender id shown on an optimistic message until the server acknowledges it.
pub const SELF_PENDING_SENDER: &str = "self-pending";

/// Identifier of a chat peer (the other side of a one-to-one conversation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Client-generated correlation token.
///
/// Tags are random UUID v4 values (122 random bits) and are only expected to
/// be unique within one connection lifetime. Collisions are not detected by
/// the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Fresh random tag.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Display status of a message handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Optimistic, not yet acknowledged.
    Sending,
    /// Acknowledged by the server, not read by the peer.
    Sent,
    /// Read by the peer.
    Read,
    /// Authored by the peer.
    Received,
    /// Acknowledgment never arrived before the pending entry expired.
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sending => "sending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Read => "read",
            DeliveryStatus::Received => "received",
            DeliveryStatus::Failed => "failed",
        }
    }

    /// Status of a self-authored message given its read marker.
    pub fn for_own(read_at: Option<DateTime<Utc>>) -> Self {
        if read_at.is_some() {
            DeliveryStatus::Read
        } else {
            DeliveryStatus::Sent
        }
    }
}

/// Chat message record (MSG payload, history entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, alias = "senderId")]
    pub sender_id: PeerId,
    #[serde(default, alias = "receiverId")]
    pub receiver_id: PeerId,
    pub content: String,
    #[serde(default, alias = "sentAt", skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// `None` while unread.
    #[serde(default, alias = "readAt")]
    pub read_at: Option<DateTime<Utc>>,
    /// Present once the server has persisted the message.
    #[serde(default, alias = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Conversation peer from the recipient's point of view.
    #[serde(default, alias = "chatId", skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<bool>,
    /// Record a system notification points at. The backend spells the key
    /// `attatchment` and sends `{}` on plain messages.
    #[serde(default, rename = "attatchment", skip_serializing_if = "Option::is_none")]
    pub attachment: Option<MessageAttachment>,
}

/// Links carried by notification messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
    #[serde(default, alias = "propertyId", skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, alias = "appointmentId", skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default, alias = "agreementId", skip_serializing_if = "Option::is_none")]
    pub agreement_id: Option<String>,
}

impl MessageAttachment {
    pub fn is_empty(&self) -> bool {
        self.property_id.is_none() && self.appointment_id.is_none() && self.agreement_id.is_none()
    }
}

impl Message {
    /// Locally-authored echo shown before the server acknowledges it.
    pub fn provisional(content: impl Into<String>, sent_at: DateTime<Utc>, to: Option<PeerId>) -> Self {
        Self {
            sender_id: PeerId::from(SELF_PENDING_SENDER),
            receiver_id: to.unwrap_or_default(),
            content: content.into(),
            sent_at: Some(sent_at),
            read_at: None,
            message_id: None,
            chat_id: None,
            author: Some(true),
            attachment: None,
        }
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Attachment with at least one link set.
    pub fn attachment(&self) -> Option<&MessageAttachment> {
        self.attachment.as_ref().filter(|a| !a.is_empty())
    }

    pub fn is_persisted(&self) -> bool {
        self.message_id.is_some()
    }

    /// Conversation this message belongs to: `chat_id` when the backend sent
    /// one, otherwise the receiver.
    pub fn conversation(&self) -> Option<&PeerId> {
        match &self.chat_id {
            Some(peer) if !peer.is_empty() => Some(peer),
            _ if !self.receiver_id.is_empty() => Some(&self.receiver_id),
            _ => None,
        }
    }

    /// Whether this user wrote the message, within the conversation with `peer`.
    ///
    /// The backend's explicit `author` flag wins; otherwise a message is ours
    /// iff the peer is its receiver.
    pub fn authored_by_self(&self, peer: &PeerId) -> bool {
        self.author.unwrap_or(self.receiver_id == *peer)
    }
}

/// Conversation-list snapshot / CHATS update record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(alias = "userId")]
    pub user_id: PeerId,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "unreadMessages")]
    pub unread_messages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl SummaryRecord {
    pub fn new(user_id: impl Into<PeerId>, content: impl Into<String>, unread_messages: u64) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            unread_messages,
            first_name: None,
            last_name: None,
            profile_image_url: None,
        }
    }
}
