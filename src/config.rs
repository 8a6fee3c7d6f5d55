use crate::relay::{RelaySettings, RetryPolicy};
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub upstream: UpstreamConfig,
    pub relay: RelayConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Connection parameters for the streaming recognition provider
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider websocket URL (the audio format is appended as query
    /// parameters when the link opens)
    pub url: String,

    /// API key; set via LOQA_TRANSCRIBE__UPSTREAM__API_KEY rather than the
    /// config file
    pub api_key: String,

    pub sample_rate: u32,
    pub channels: u16,
    pub connect_timeout_secs: u64,
}

/// Resilience policy for the upstream link
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Consecutive reconnect attempts before giving up on a session
    pub reconnect_max_attempts: u32,

    /// Backoff before the first reconnect attempt; doubles per attempt
    pub reconnect_base_delay_ms: u64,

    /// Backoff cap
    pub reconnect_max_delay_ms: u64,

    /// Audio frames held while reconnecting; the oldest are dropped beyond
    /// this capacity
    pub buffer_frames: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_bullets: usize,
    pub max_line_chars: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "loqa-transcribe".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "wss://api.deepgram.com/v1/listen".to_string(),
            api_key: String::new(),
            sample_rate: 16000, // PCM16 mono at 16kHz
            channels: 1,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            reconnect_max_attempts: 4,
            reconnect_base_delay_ms: 500,
            reconnect_max_delay_ms: 8000,
            buffer_frames: 256, // a few seconds of audio at typical frame sizes
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_bullets: 12,
            max_line_chars: 200,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then an optional file, then
    /// LOQA_TRANSCRIBE__* environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("LOQA_TRANSCRIBE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Relay settings for one session
    pub fn relay_settings(&self, session_id: &str) -> RelaySettings {
        RelaySettings {
            session_id: session_id.to_string(),
            buffer_frames: self.relay.buffer_frames,
            retry: RetryPolicy {
                max_attempts: self.relay.reconnect_max_attempts,
                base_delay: Duration::from_millis(self.relay.reconnect_base_delay_ms),
                max_delay: Duration::from_millis(self.relay.reconnect_max_delay_ms),
            },
        }
    }
}
