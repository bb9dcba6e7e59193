//! chatsync core: wire protocol, domain model, and the shared error type.
//!
//! This crate defines the envelope contracts exchanged with the chat backend
//! and the records carried inside them. It has no runtime or transport
//! dependencies so the sync engine can be driven from tests, a tokio session
//! task, or any other host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed frames
//! surface as `ChatSyncError::Malformed` so a hostile or buggy backend cannot
//! crash the client.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod protocol;

/// Shared result type.
pub use error::{ChatSyncError, Result};
pub use model::{DeliveryStatus, Message, MessageAttachment, PeerId, SummaryRecord, Tag};
