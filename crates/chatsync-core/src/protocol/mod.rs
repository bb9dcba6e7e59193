//! Wire protocol (JSON text frames).
//!
//! - Outbound: `{event, content, sent_at, tag}` envelopes for MSG/JOIN/LEFT.
//! - Inbound: `{event, tag?, payload?}` envelopes, decoded once at the
//!   boundary into [`inbound::InboundEvent`].
//!
//! Decoding is panic-free: malformed frames are reported as
//! `ChatSyncError::Malformed` and unknown event kinds are surfaced as
//! `InboundEvent::Unknown` for the dispatcher to skip.

pub mod inbound;
pub mod outbound;

pub use inbound::{decode_inbound, InboundEvent, RawEnvelope, ReadSignal};
pub use outbound::{OutboundEnvelope, OutboundEvent};
