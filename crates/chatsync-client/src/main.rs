//! chatsync headless client.
//!
//! Connects to the backend named in the config, then reads commands from
//! stdin:
//! - `/join <peer>` focus a conversation and load its history
//! - `/leave` drop focus
//! - `/chats` reload the conversation list
//! - `/quit` exit
//! - anything else is sent as a message to the focused conversation

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use chatsync_core::error::{ChatSyncError, Result};

use chatsync_client::console::{parse_line, ConsoleCommand, ConsolePresentation};
use chatsync_client::engine::{SyncEngine, SyncOptions};
use chatsync_client::transport::{connect, ChannelOutbound, HttpDataSource};
use chatsync_client::{config, runtime};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.client_code().as_str(), error = %e, "chatsync exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "chatsync.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let ws_url = Url::parse(&cfg.client.ws_url)
        .map_err(|e| ChatSyncError::Config(format!("client.ws_url invalid: {e}")))?;
    let (events, frames) = connect(ws_url, cfg.client.outbound_queue);

    let engine = SyncEngine::new(
        ConsolePresentation::new(),
        ChannelOutbound::new(frames),
        SyncOptions::from(&cfg.sync),
    );
    let data = Arc::new(HttpDataSource::new(&cfg.client.api_base, cfg.client.history_limit)?);

    let (handle, task) = runtime::spawn(engine, data, cfg.sync.sweep_interval(), events);
    tracing::info!(config = %path, "chatsync starting");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|e| ChatSyncError::Internal(format!("stdin: {e}")))?;
        let Some(line) = line else { break; };

        let res = match parse_line(&line) {
            ConsoleCommand::Empty => Ok(()),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Leave => handle.leave().await,
            ConsoleCommand::RefreshConversations => handle.refresh_conversations().await,
            ConsoleCommand::Join(peer) => handle.join(peer).await,
            ConsoleCommand::Send(text) => handle.send(text).await.map(|_| ()),
            ConsoleCommand::Usage(usage) => {
                tracing::warn!(usage, "missing argument");
                Ok(())
            }
        };

        match res {
            Ok(()) => {}
            Err(ChatSyncError::Disconnected) if task.is_finished() => break,
            Err(e) => tracing::warn!(code = e.client_code().as_str(), error = %e, "command rejected"),
        }
    }

    let _ = handle.shutdown().await;
    let engine = task
        .await
        .map_err(|e| ChatSyncError::Internal(format!("session task: {e}")))?;
    tracing::info!(
        pending = engine.pending_count(),
        awaiting_read = engine.awaiting_read_count(),
        "session ended"
    );
    Ok(())
}
