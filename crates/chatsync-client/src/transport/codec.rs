//! Frame codec for the WebSocket transport.
//!
//! - Text frames are passed through for the engine to decode once
//! - Close frames end the session
//! - Ping/Pong/Binary carry nothing for the sync protocol

use tokio_tungstenite::tungstenite::Message;

use chatsync_core::error::Result;
use chatsync_core::protocol::OutboundEnvelope;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Close,
    Ignored,
}

pub fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Text(s),
        Message::Close(_) => Inbound::Close,
        Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
            Inbound::Ignored
        }
    }
}

pub fn encode(envelope: &OutboundEnvelope) -> Result<Message> {
    Ok(Message::Text(envelope.to_json()?))
}
