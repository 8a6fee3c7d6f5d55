use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transcript event parsed from an upstream message
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEvent {
    /// Recognized text for this event
    pub text: String,

    /// Settled result (true) or interim result subject to revision (false)
    pub is_final: bool,

    /// Confidence score, if the provider reported one
    pub confidence: Option<f32>,
}

/// Classification of one inbound upstream message
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamMessage {
    /// A usable transcript event
    Transcript(TranscriptEvent),

    /// The service reported an error for this stream
    Error(String),

    /// Keep-alive, metadata, empty transcript or unrecognized payload
    Ignored,
}

/// Parse one JSON message from the recognition service
///
/// Recognized shapes:
/// - nested provider results: `channel.alternatives[0].transcript` with a
///   top-level `is_final` flag
/// - flat results: top-level `transcript` or `text` plus `is_final`
/// - `{"error": "..."}` surfaces as `UpstreamMessage::Error`
///
/// Anything else (including empty transcripts) is ignored rather than
/// treated as a failure.
pub fn parse_upstream_message(raw: &str) -> UpstreamMessage {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return UpstreamMessage::Ignored,
    };

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return UpstreamMessage::Error(error.to_string());
    }

    let alternative = value
        .get("channel")
        .and_then(|channel| channel.get("alternatives"))
        .and_then(Value::as_array)
        .and_then(|alternatives| alternatives.first());

    let (text, confidence) = match alternative {
        Some(alternative) => (
            alternative.get("transcript").and_then(Value::as_str),
            alternative.get("confidence").and_then(Value::as_f64),
        ),
        None => (
            value
                .get("transcript")
                .or_else(|| value.get("text"))
                .and_then(Value::as_str),
            value.get("confidence").and_then(Value::as_f64),
        ),
    };

    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => return UpstreamMessage::Ignored,
    };

    let is_final = value
        .get("is_final")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    UpstreamMessage::Transcript(TranscriptEvent {
        text: text.to_string(),
        is_final,
        confidence: confidence.map(|c| c as f32),
    })
}

/// Transcript event relayed to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptPayload {
    pub transcript: String,
    pub is_final: bool,
}

/// Error event relayed to the client before closing the connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Connection lifecycle notification for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

impl StatusPayload {
    pub fn connecting() -> Self {
        Self {
            status: "connecting_upstream".to_string(),
        }
    }

    pub fn connected() -> Self {
        Self {
            status: "upstream_connected".to_string(),
        }
    }

    pub fn reconnected() -> Self {
        Self {
            status: "upstream_reconnected".to_string(),
        }
    }
}

/// A text message received from the client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// Legacy base64-encoded audio payload (`{"audio": "..."}`); binary
    /// frames are the preferred transport
    Audio(Vec<u8>),

    /// Explicit end-session request (`{"action": "end"}`)
    End,

    /// Anything else; skipped
    Ignored,
}

/// Parse a client text message into a command
pub fn parse_client_text(raw: &str) -> ClientCommand {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return ClientCommand::Ignored,
    };

    if value.get("action").and_then(Value::as_str) == Some("end") {
        return ClientCommand::End;
    }

    if let Some(encoded) = value.get("audio").and_then(Value::as_str) {
        if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(encoded) {
            if !bytes.is_empty() {
                return ClientCommand::Audio(bytes);
            }
        }
    }

    ClientCommand::Ignored
}
