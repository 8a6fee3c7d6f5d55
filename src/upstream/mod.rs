//! Upstream recognition service link
//!
//! This module owns the outbound connection to the streaming
//! speech-recognition provider:
//! - `RecognitionConnector` / `AudioSink` / `EventStream`: the narrow seam
//!   the relay drives, so tests can substitute an in-memory link
//! - `WsConnector`: the websocket implementation (audio frames out,
//!   JSON transcript events in)
//! - message parsing for upstream events and client-bound payloads

pub mod error;
pub mod link;
pub mod messages;

pub use error::{ConnectError, LinkError};
pub use link::{AudioFrame, AudioSink, EventStream, LinkPair, RecognitionConnector, WsConnector};
pub use messages::{
    ClientCommand, ErrorPayload, StatusPayload, TranscriptEvent, TranscriptPayload,
    UpstreamMessage,
};
