use thiserror::Error;

/// Failure to establish a connection to the recognition service
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("recognition service API key is not configured")]
    MissingCredential,

    #[error("timed out connecting to the recognition service")]
    Timeout,

    #[error("recognition service handshake failed: {0}")]
    Handshake(String),
}

/// Runtime failure on an established upstream link
#[derive(Debug, Error)]
pub enum LinkError {
    /// The transport dropped mid-stream; reconnecting may recover it
    #[error("upstream connection lost: {0}")]
    ConnectionLost(String),

    /// The service reported an error for this stream; reconnecting with the
    /// same parameters will not help
    #[error("recognition service error: {0}")]
    Remote(String),

    /// Protocol-level rejection of the stream
    #[error("upstream rejected the stream: {0}")]
    Rejected(String),
}

impl LinkError {
    /// Transient errors trigger reconnection; fatal ones end the session
    pub fn is_transient(&self) -> bool {
        matches!(self, LinkError::ConnectionLost(_))
    }
}
