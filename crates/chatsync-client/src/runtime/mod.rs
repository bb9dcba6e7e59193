//! Session runtime.
//!
//! One tokio task owns the [`SyncEngine`](crate::engine::SyncEngine) and is
//! the only writer of its state. Commands, transport events, fetch
//! completions, and the expiry sweep are multiplexed onto that task, so
//! handlers never interleave.

mod handle;
mod session;

pub use handle::{Command, SyncHandle};
pub use session::{spawn, Session};
