//! Dispatcher module exports.
//!
//! Routes decoded inbound events to the reconciliation routine for their kind.

pub mod dispatcher;

pub use dispatcher::Dispatcher;
