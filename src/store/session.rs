use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::warn;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// A client connection is (or was recently) feeding this session
    Active,
    /// The client disconnected or ended the session; the log is frozen
    Ended,
}

/// A single transcript event received from the recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Recognized text
    pub text: String,

    /// Whether this is a settled result (false = interim, may be revised
    /// by a later line but never edited in place)
    pub is_final: bool,

    /// Confidence score (0.0 to 1.0), if the provider reported one
    pub confidence: Option<f32>,

    /// When this line was received
    pub received_at: DateTime<Utc>,
}

/// Point-in-time snapshot of a session, served by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,

    /// Number of transcript lines stored so far
    pub transcript_lines: usize,

    /// Audio frames forwarded to the recognition service
    pub frames_forwarded: u64,

    /// Audio frames dropped during reconnection gaps
    pub frames_dropped: u64,

    /// Successful upstream reconnections
    pub reconnects: u64,
}

/// State for one transcription session
///
/// The transcript log is append-only while the session is Active and frozen
/// once Ended. Appends and reads are safe to interleave: the relay appends
/// while a summarization request snapshots the log.
pub struct SessionHandle {
    id: String,
    started_at: DateTime<Utc>,
    active: AtomicBool,
    lines: Mutex<Vec<TranscriptLine>>,
    frames_forwarded: AtomicU64,
    frames_dropped: AtomicU64,
    reconnects: AtomicU64,
}

impl SessionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: Utc::now(),
            active: AtomicBool::new(true),
            lines: Mutex::new(Vec::new()),
            frames_forwarded: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        if self.active.load(Ordering::SeqCst) {
            SessionStatus::Active
        } else {
            SessionStatus::Ended
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Append a transcript line in arrival order
    ///
    /// Returns false (and keeps the log untouched) once the session has ended.
    pub async fn append(&self, line: TranscriptLine) -> bool {
        if !self.is_active() {
            warn!("Ignoring transcript line for ended session {}", self.id);
            return false;
        }

        let mut lines = self.lines.lock().await;
        lines.push(line);
        true
    }

    /// Snapshot of the accumulated transcript
    pub async fn transcript(&self) -> Vec<TranscriptLine> {
        let lines = self.lines.lock().await;
        lines.clone()
    }

    /// Just the text of each stored line, in arrival order
    pub async fn text_lines(&self) -> Vec<String> {
        let lines = self.lines.lock().await;
        lines.iter().map(|line| line.text.clone()).collect()
    }

    pub async fn line_count(&self) -> usize {
        let lines = self.lines.lock().await;
        lines.len()
    }

    /// Mark the session as ended, freezing the transcript log
    pub fn end(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn record_forwarded(&self) {
        self.frames_forwarded.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::SeqCst)
    }

    /// Current session snapshot
    pub async fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            status: self.status(),
            started_at: self.started_at,
            transcript_lines: self.line_count().await,
            frames_forwarded: self.frames_forwarded.load(Ordering::SeqCst),
            frames_dropped: self.frames_dropped.load(Ordering::SeqCst),
            reconnects: self.reconnects.load(Ordering::SeqCst),
        }
    }
}

impl TranscriptLine {
    /// Build a line stamped with the current time
    pub fn now(text: impl Into<String>, is_final: bool, confidence: Option<f32>) -> Self {
        Self {
            text: text.into(),
            is_final,
            confidence,
            received_at: Utc::now(),
        }
    }
}
