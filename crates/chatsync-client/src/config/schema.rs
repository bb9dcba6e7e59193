use std::time::Duration;

use serde::Deserialize;
use url::Url;

use chatsync_core::error::{ChatSyncError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    pub client: ClientSection,

    #[serde(default)]
    pub sync: SyncSection,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ChatSyncError::UnsupportedVersion);
        }

        self.client.validate()?;
        self.sync.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// WebSocket endpoint of the chat backend.
    pub ws_url: String,

    /// Base of the REST API serving `/chats` and `/chats/{peer}`.
    pub api_base: String,

    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl ClientSection {
    pub fn validate(&self) -> Result<()> {
        let ws = Url::parse(&self.ws_url)
            .map_err(|e| ChatSyncError::Config(format!("client.ws_url invalid: {e}")))?;
        if !matches!(ws.scheme(), "ws" | "wss") {
            return Err(ChatSyncError::Config(
                "client.ws_url must use ws:// or wss://".into(),
            ));
        }
        let api = Url::parse(&self.api_base)
            .map_err(|e| ChatSyncError::Config(format!("client.api_base invalid: {e}")))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(ChatSyncError::Config(
                "client.api_base must use http:// or https://".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(ChatSyncError::Config(
                "client.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        // backend caps pages at 50
        if !(1..=50).contains(&self.history_limit) {
            return Err(ChatSyncError::Config(
                "client.history_limit must be between 1 and 50".into(),
            ));
        }
        Ok(())
    }
}

fn default_outbound_queue() -> usize {
    1024
}
fn default_history_limit() -> u32 {
    50
}

/// Which self-sent messages a READ signal marks as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadScope {
    /// Every outstanding self-sent message, whatever the conversation.
    #[default]
    Global,
    /// Only messages sent to the peer named by the READ signal. Signals that
    /// name no peer fall back to `Global`.
    PerPeer,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Pending send lifetime; 0 keeps entries until acknowledged.
    #[serde(default = "default_pending_ttl_ms")]
    pub pending_ttl_ms: u64,

    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    #[serde(default)]
    pub read_scope: ReadScope,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            pending_ttl_ms: default_pending_ttl_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            read_scope: ReadScope::default(),
        }
    }
}

impl SyncSection {
    pub fn validate(&self) -> Result<()> {
        if self.pending_ttl_ms != 0 && !(1000..=3_600_000).contains(&self.pending_ttl_ms) {
            return Err(ChatSyncError::Config(
                "sync.pending_ttl_ms must be 0 or between 1000 and 3600000".into(),
            ));
        }
        if !(100..=60000).contains(&self.sweep_interval_ms) {
            return Err(ChatSyncError::Config(
                "sync.sweep_interval_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn pending_ttl(&self) -> Option<Duration> {
        (self.pending_ttl_ms > 0).then(|| Duration::from_millis(self.pending_ttl_ms))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn default_pending_ttl_ms() -> u64 {
    30000
}
fn default_sweep_interval_ms() -> u64 {
    1000
}
