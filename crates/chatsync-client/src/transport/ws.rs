//! WebSocket transport.
//!
//! Owns the socket in a spawned task and exposes it as two channels:
//! transport events in, text frames out. Connection retry is not attempted;
//! a failed handshake or dropped socket surfaces as `TransportEvent::Closed`.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::protocol::OutboundEnvelope;

use crate::engine::Outbound;
use crate::transport::codec::{self, Inbound};

/// Signals from the transport to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Frame(String),
    Closed { reason: Option<String> },
}

/// Open the socket in the background.
///
/// Returns the inbound event receiver and the outbound frame sender.
pub fn connect(url: Url, queue: usize) -> (mpsc::Receiver<TransportEvent>, mpsc::Sender<Message>) {
    let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(queue);
    let (out_tx, out_rx) = mpsc::channel::<Message>(queue);

    tokio::spawn(async move {
        let reason = run_socket(url, &event_tx, out_rx).await.err().map(|e| e.to_string());
        let _ = event_tx.send(TransportEvent::Closed { reason }).await;
    });

    (event_rx, out_tx)
}

async fn run_socket(
    url: Url,
    events: &mpsc::Sender<TransportEvent>,
    mut out_rx: mpsc::Receiver<Message>,
) -> Result<()> {
    let (ws, _resp) = connect_async(url.as_str())
        .await
        .map_err(|e| ChatSyncError::Transport(format!("handshake failed: {e}")))?;
    tracing::info!(%url, "websocket connected");

    events
        .send(TransportEvent::Opened)
        .await
        .map_err(|_| ChatSyncError::Internal("session channel closed".into()))?;

    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                ws_tx
                    .send(m)
                    .await
                    .map_err(|e| ChatSyncError::Transport(format!("write failed: {e}")))?;
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = incoming
                    .map_err(|e| ChatSyncError::Transport(format!("read failed: {e}")))?;

                match codec::classify(msg) {
                    Inbound::Text(s) => {
                        if events.send(TransportEvent::Frame(s)).await.is_err() {
                            break;
                        }
                    }
                    Inbound::Close => break,
                    Inbound::Ignored => {}
                }
            }
        }
    }

    let _ = ws_tx.close().await;
    Ok(())
}

/// [`Outbound`] over the transport's frame queue. Never blocks: a full queue
/// is reported as a transport error.
pub struct ChannelOutbound {
    tx: mpsc::Sender<Message>,
}

impl ChannelOutbound {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }
}

impl Outbound for ChannelOutbound {
    fn transmit(&mut self, envelope: &OutboundEnvelope) -> Result<()> {
        let frame = codec::encode(envelope)?;
        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                ChatSyncError::Transport("outbound queue full".into())
            }
            mpsc::error::TrySendError::Closed(_) => ChatSyncError::Disconnected,
        })
    }
}
