//! Shared error type across chatsync crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Inbound frame could not be decoded.
    Malformed,
    /// Connection is not open.
    Disconnected,
    /// Refused to send an empty message.
    EmptyContent,
    /// Correlation tag already pending.
    DuplicateTag,
    /// Transport failed to carry a frame.
    Transport,
    /// History or conversation-list fetch failed.
    Fetch,
    /// Invalid configuration.
    Config,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Internal client error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and surfaced to the presentation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Malformed => "MALFORMED",
            ClientCode::Disconnected => "DISCONNECTED",
            ClientCode::EmptyContent => "EMPTY_CONTENT",
            ClientCode::DuplicateTag => "DUPLICATE_TAG",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Fetch => "FETCH",
            ClientCode::Config => "CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChatSyncError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum ChatSyncError {
    #[error("malformed envelope: {0}")]
    Malformed(String),
    #[error("connection is not open")]
    Disconnected,
    #[error("message content is empty")]
    EmptyContent,
    #[error("tag already pending: {0}")]
    DuplicateTag(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ChatSyncError {
    /// Map internal error to a stable caller-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ChatSyncError::Malformed(_) => ClientCode::Malformed,
            ChatSyncError::Disconnected => ClientCode::Disconnected,
            ChatSyncError::EmptyContent => ClientCode::EmptyContent,
            ChatSyncError::DuplicateTag(_) => ClientCode::DuplicateTag,
            ChatSyncError::Transport(_) => ClientCode::Transport,
            ChatSyncError::Fetch(_) => ClientCode::Fetch,
            ChatSyncError::Config(_) => ClientCode::Config,
            ChatSyncError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            ChatSyncError::Internal(_) => ClientCode::Internal,
        }
    }
}
