use crate::config::Config;
use crate::store::SessionStore;
use crate::upstream::RecognitionConnector;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Session registry shared by the relay and the query endpoints
    pub store: Arc<SessionStore>,

    /// Opens upstream recognition links for new sessions
    pub connector: Arc<dyn RecognitionConnector>,
}

impl AppState {
    pub fn new(config: Config, connector: Arc<dyn RecognitionConnector>) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(SessionStore::new()),
            connector,
        }
    }
}
