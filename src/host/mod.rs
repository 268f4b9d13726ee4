//! Typed request/response channel to the process embedding the editor.
//!
//! Requests are paired with answers by message kind. One-shot subscribers of the
//! same kind are served first come, first served; recurring subscribers see every
//! matching event until they are dropped.

pub mod bridge;
pub mod message;

pub use bridge::{EventStream, HostBridge, HostEndpoint, PendingResponse};
pub use message::*;
