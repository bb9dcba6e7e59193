//! Top-level facade crate for chatsync.
//!
//! Re-exports the core protocol types and the client library so users can depend on a single crate.

pub mod core {
    pub use chatsync_core::*;
}

pub mod client {
    pub use chatsync_client::*;
}
