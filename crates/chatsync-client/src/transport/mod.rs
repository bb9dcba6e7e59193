//! Transport adapters.
//!
//! WebSocket channel (tokio-tungstenite), HTTP data source (reqwest), and the
//! codec that sits between raw frames and the engine.

pub mod codec;
pub mod http;
pub mod ws;

pub use http::HttpDataSource;
pub use ws::{connect, ChannelOutbound, TransportEvent};
