use std::cmp;
use std::time::Duration;

/// Configuration for one relay session
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Session identifier (supplied by the client connection)
    pub session_id: String,

    /// Frames held while the upstream link is down; older frames are
    /// dropped beyond this
    pub buffer_frames: usize,

    /// Reconnection policy for the upstream link
    pub retry: RetryPolicy,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            buffer_frames: 256,
            retry: RetryPolicy::default(),
        }
    }
}

/// Bounded-retry exponential backoff for upstream reconnection
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Consecutive failed attempts before the session is given up
    pub max_attempts: u32,

    /// Delay before the first attempt; doubles each attempt
    pub base_delay: Duration,

    /// Upper bound on the per-attempt delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the given attempt (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1u32 << doublings);
        cmp::min(delay, self.max_delay)
    }
}
