//! chatsync client library entry.
//!
//! This crate wires the correlation table, conversation state, chat list
//! aggregate, and event dispatcher into the sync engine, and provides the
//! tokio session runtime plus WebSocket/HTTP adapters that drive it. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod engine;
pub mod runtime;
pub mod state;
pub mod transport;
