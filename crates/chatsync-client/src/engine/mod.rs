//! Sync engine: composition of state, dispatcher, and collaborator ports.
//!
//! The engine is a plain `&mut self` state machine. It performs no I/O of its
//! own; transmission goes through [`Outbound`], rendering through
//! [`Presentation`], and history/list fetches are driven by the session
//! runtime via [`DataSource`].

mod ports;
mod sync_engine;

pub use ports::{ConnectionState, DataSource, Outbound, Presentation};
pub use sync_engine::{SyncEngine, SyncOptions};
