//! HTTP API server: realtime ingress and transcript queries
//!
//! This module provides the external surface of the relay:
//! - GET /ws/transcribe/:session_id - client audio stream ingress (websocket)
//! - POST /summarize - summarize a stored transcript
//! - GET /sessions/:session_id/transcript - accumulated transcript
//! - GET /sessions/:session_id/status - session snapshot with relay counters
//! - GET /health - health check

mod handlers;
mod routes;
mod state;
mod ws;

pub use routes::create_router;
pub use state::AppState;
