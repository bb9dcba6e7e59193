use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use chatsync_core::error::Result;
use chatsync_core::model::{Message, PeerId, SummaryRecord};

use crate::engine::{DataSource, Outbound, Presentation, SyncEngine};
use crate::runtime::handle::{Command, SyncHandle};
use crate::transport::TransportEvent;

const COMMAND_QUEUE: usize = 64;

/// Completed data-source request, reported back to the session task.
enum Fetched {
    History {
        peer: PeerId,
        result: Result<Vec<Message>>,
    },
    Conversations(Result<Vec<SummaryRecord>>),
}

/// Single-owner driver for a [`SyncEngine`].
pub struct Session<P: Presentation, O: Outbound, D: DataSource> {
    engine: SyncEngine<P, O>,
    data: Arc<D>,
    sweep_every: Duration,
}

impl<P, O, D> Session<P, O, D>
where
    P: Presentation + 'static,
    O: Outbound + 'static,
    D: DataSource + 'static,
{
    pub fn new(engine: SyncEngine<P, O>, data: Arc<D>, sweep_every: Duration) -> Self {
        Self {
            engine,
            data,
            sweep_every,
        }
    }

    /// Run until the transport closes, shutdown is requested, or every handle
    /// is dropped. Returns the engine for inspection.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut transport: mpsc::Receiver<TransportEvent>,
    ) -> SyncEngine<P, O> {
        let (fetch_tx, mut fetch_rx) = mpsc::channel::<Fetched>(16);

        let mut sweep = tokio::time::interval(self.sweep_every);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = transport.recv() => {
                    match event {
                        Some(TransportEvent::Opened) => {
                            self.engine.on_open();
                            self.fetch_conversations(&fetch_tx);
                        }
                        Some(TransportEvent::Frame(text)) => self.engine.on_frame(&text),
                        Some(TransportEvent::Closed { reason }) => {
                            tracing::info!(reason = ?reason, "transport closed");
                            break;
                        }
                        None => break,
                    }
                }

                cmd = commands.recv() => {
                    match cmd {
                        Some(Command::Send { content, reply }) => {
                            let _ = reply.send(self.engine.send(&content));
                        }
                        Some(Command::Join(peer)) => {
                            if let Err(e) = self.engine.join_conversation(peer.clone()) {
                                tracing::warn!(%peer, error = %e, "JOIN transmit failed");
                            }
                            self.fetch_history(peer, &fetch_tx);
                        }
                        Some(Command::Leave) => {
                            if let Err(e) = self.engine.leave_conversation() {
                                tracing::warn!(error = %e, "LEFT transmit failed");
                            }
                        }
                        Some(Command::RefreshConversations) => self.fetch_conversations(&fetch_tx),
                        Some(Command::Shutdown) | None => break,
                    }
                }

                Some(done) = fetch_rx.recv() => self.on_fetched(done),

                _ = sweep.tick() => {
                    let expired = self.engine.expire_pending(Instant::now());
                    if expired > 0 {
                        tracing::debug!(expired, "pending sweep");
                    }
                }
            }
        }

        self.engine.on_close();
        self.engine
    }

    fn on_fetched(&mut self, done: Fetched) {
        match done {
            Fetched::History { peer, result } => match result {
                Ok(messages) => {
                    self.engine.apply_history(&peer, messages);
                }
                Err(e) => tracing::warn!(%peer, error = %e, "history fetch failed"),
            },
            Fetched::Conversations(result) => match result {
                Ok(records) => self.engine.apply_conversation_list(records),
                Err(e) => tracing::warn!(error = %e, "conversation list fetch failed"),
            },
        }
    }

    fn fetch_history(&self, peer: PeerId, done: &mpsc::Sender<Fetched>) {
        let data = Arc::clone(&self.data);
        let done = done.clone();
        tokio::spawn(async move {
            let result = data.fetch_history(&peer).await;
            let _ = done.send(Fetched::History { peer, result }).await;
        });
    }

    fn fetch_conversations(&self, done: &mpsc::Sender<Fetched>) {
        let data = Arc::clone(&self.data);
        let done = done.clone();
        tokio::spawn(async move {
            let result = data.fetch_conversations().await;
            let _ = done.send(Fetched::Conversations(result)).await;
        });
    }
}

/// Spawn a session task over `transport`. The returned join handle yields the
/// engine once the session ends.
pub fn spawn<P, O, D>(
    engine: SyncEngine<P, O>,
    data: Arc<D>,
    sweep_every: Duration,
    transport: mpsc::Receiver<TransportEvent>,
) -> (SyncHandle, JoinHandle<SyncEngine<P, O>>)
where
    P: Presentation + 'static,
    O: Outbound + 'static,
    D: DataSource + 'static,
{
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let session = Session::new(engine, data, sweep_every);
    let task = tokio::spawn(session.run(rx, transport));
    (SyncHandle::new(tx), task)
}
