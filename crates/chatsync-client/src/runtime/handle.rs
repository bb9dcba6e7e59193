use tokio::sync::{mpsc, oneshot};

use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::model::{PeerId, Tag};

/// Requests from the presentation layer to the session task.
#[derive(Debug)]
pub enum Command {
    Send {
        content: String,
        reply: oneshot::Sender<Result<Tag>>,
    },
    Join(PeerId),
    Leave,
    RefreshConversations,
    Shutdown,
}

/// Cloneable front door to a running session.
///
/// Every method fails with `Disconnected` once the session task has ended.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<Command>,
}

impl SyncHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    /// Send a message; resolves once the engine accepted or rejected it.
    pub async fn send(&self, content: impl Into<String>) -> Result<Tag> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Send {
            content: content.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| ChatSyncError::Disconnected)?
    }

    pub async fn join(&self, peer: impl Into<PeerId>) -> Result<()> {
        self.submit(Command::Join(peer.into())).await
    }

    pub async fn leave(&self) -> Result<()> {
        self.submit(Command::Leave).await
    }

    pub async fn refresh_conversations(&self) -> Result<()> {
        self.submit(Command::RefreshConversations).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.submit(Command::Shutdown).await
    }

    async fn submit(&self, cmd: Command) -> Result<()> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| ChatSyncError::Disconnected)
    }
}
