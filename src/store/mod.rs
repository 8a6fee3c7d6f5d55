//! In-memory session registry
//!
//! This module provides the shared session state for the relay:
//! - `SessionStore`: concurrency-safe id → session map
//! - `SessionHandle`: per-session transcript log, status and counters
//!
//! Sessions are created by the websocket ingress, appended to by the relay,
//! and read by the summarize/transcript endpoints. Entries are kept for the
//! lifetime of the process; an eviction policy can be layered on top via
//! `SessionStore::len` without touching the contract.

mod session;
mod store;

pub use session::{SessionHandle, SessionInfo, SessionStatus, TranscriptLine};
pub use store::SessionStore;
