// Environment override tests live in their own binary so the env mutation
// cannot race the other config tests.

use loqa_transcribe::config::Config;

#[test]
fn test_env_overrides_config() {
    std::env::set_var("LOQA_TRANSCRIBE__UPSTREAM__API_KEY", "test-key");
    std::env::set_var("LOQA_TRANSCRIBE__SERVICE__HTTP__PORT", "9999");

    let cfg = Config::load("/nonexistent/loqa-transcribe-env").unwrap();

    assert_eq!(cfg.upstream.api_key, "test-key");
    assert_eq!(cfg.service.http.port, 9999);

    std::env::remove_var("LOQA_TRANSCRIBE__UPSTREAM__API_KEY");
    std::env::remove_var("LOQA_TRANSCRIBE__SERVICE__HTTP__PORT");
}
