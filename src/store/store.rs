use super::session::SessionHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Concurrency-safe registry of transcription sessions (session_id → state)
///
/// Sessions are never removed; ending a session freezes its transcript but
/// keeps it readable for summarization.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the session for an id
    ///
    /// Reconnect-friendly: an id that maps to an Active session returns the
    /// existing handle so a second connection keeps appending to the same
    /// transcript. An id whose session has Ended gets a fresh handle with an
    /// empty transcript.
    pub async fn create(&self, id: &str) -> Arc<SessionHandle> {
        let mut sessions = self.sessions.write().await;

        if let Some(existing) = sessions.get(id) {
            if existing.is_active() {
                info!("Reusing active session {}", id);
                return Arc::clone(existing);
            }
        }

        info!("Creating session {}", id);
        let handle = Arc::new(SessionHandle::new(id));
        sessions.insert(id.to_string(), Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, id: &str) -> Option<Arc<SessionHandle>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    /// End the session for an id, if present
    pub async fn end(&self, id: &str) {
        let sessions = self.sessions.read().await;
        if let Some(session) = sessions.get(id) {
            info!("Ending session {}", id);
            session.end();
        }
    }

    /// Number of sessions held (active and ended)
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
