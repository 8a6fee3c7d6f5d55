// Configuration loading tests: defaults, file overrides, and the retry
// policy derived from them.

use loqa_transcribe::config::Config;
use loqa_transcribe::relay::{RelaySettings, RetryPolicy};
use std::time::Duration;

#[test]
fn test_defaults_without_config_file() {
    let cfg = Config::load("/nonexistent/loqa-transcribe-defaults").unwrap();

    assert_eq!(cfg.service.name, "loqa-transcribe");
    assert_eq!(cfg.service.http.bind, "0.0.0.0");
    assert_eq!(cfg.service.http.port, 8000);

    assert_eq!(cfg.upstream.sample_rate, 16000, "provider expects 16kHz PCM");
    assert_eq!(cfg.upstream.channels, 1, "mono audio");
    assert!(cfg.upstream.api_key.is_empty());
    assert_eq!(cfg.upstream.connect_timeout_secs, 10);

    assert_eq!(cfg.relay.reconnect_max_attempts, 4);
    assert_eq!(cfg.relay.buffer_frames, 256);

    assert_eq!(cfg.summary.max_bullets, 12);
    assert_eq!(cfg.summary.max_line_chars, 200);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loqa-transcribe.toml");
    std::fs::write(
        &path,
        r#"
[service]
name = "relay-test"

[service.http]
port = 9101

[upstream]
url = "wss://asr.example.test/listen"
sample_rate = 8000

[relay]
reconnect_max_attempts = 2
buffer_frames = 8
"#,
    )
    .unwrap();

    let cfg = Config::load(path.to_str().unwrap()).unwrap();

    assert_eq!(cfg.service.name, "relay-test");
    assert_eq!(cfg.service.http.port, 9101);
    assert_eq!(cfg.upstream.url, "wss://asr.example.test/listen");
    assert_eq!(cfg.upstream.sample_rate, 8000);
    assert_eq!(cfg.relay.reconnect_max_attempts, 2);
    assert_eq!(cfg.relay.buffer_frames, 8);

    // Untouched sections keep their defaults
    assert_eq!(cfg.service.http.bind, "0.0.0.0");
    assert_eq!(cfg.upstream.channels, 1);
    assert_eq!(cfg.summary.max_bullets, 12);
}

#[test]
fn test_retry_policy_doubles_and_caps() {
    let policy = RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(8),
    };

    assert_eq!(policy.delay(1), Duration::from_millis(500));
    assert_eq!(policy.delay(2), Duration::from_millis(1000));
    assert_eq!(policy.delay(3), Duration::from_millis(2000));
    assert_eq!(policy.delay(4), Duration::from_millis(4000));
    assert_eq!(policy.delay(5), Duration::from_secs(8));
    assert_eq!(policy.delay(10), Duration::from_secs(8), "delay must stay capped");
}

#[test]
fn test_relay_settings_from_config() {
    let cfg = Config::default();
    let settings = cfg.relay_settings("abc123");

    assert_eq!(settings.session_id, "abc123");
    assert_eq!(settings.buffer_frames, 256);
    assert_eq!(settings.retry.max_attempts, 4);
    assert_eq!(settings.retry.base_delay, Duration::from_millis(500));
    assert_eq!(settings.retry.max_delay, Duration::from_millis(8000));
}

#[test]
fn test_default_relay_settings_generate_unique_ids() {
    let first = RelaySettings::default();
    let second = RelaySettings::default();

    assert!(first.session_id.starts_with("session-"));
    assert_ne!(first.session_id, second.session_id);
}
