// Wire-format tests: upstream event parsing, client-bound payloads, and
// client text commands.

use base64::Engine;
use loqa_transcribe::upstream::messages::{parse_client_text, parse_upstream_message};
use loqa_transcribe::upstream::{
    ClientCommand, ErrorPayload, StatusPayload, TranscriptEvent, TranscriptPayload,
    UpstreamMessage,
};

#[test]
fn test_parse_nested_provider_result() {
    let raw = r#"{
        "channel": {
            "alternatives": [
                {"transcript": "hello world", "confidence": 0.97}
            ]
        },
        "is_final": true
    }"#;

    let parsed = parse_upstream_message(raw);
    assert_eq!(
        parsed,
        UpstreamMessage::Transcript(TranscriptEvent {
            text: "hello world".to_string(),
            is_final: true,
            confidence: Some(0.97),
        })
    );
}

#[test]
fn test_parse_flat_transcript_field() {
    let parsed = parse_upstream_message(r#"{"transcript": "partial words", "is_final": false}"#);
    assert_eq!(
        parsed,
        UpstreamMessage::Transcript(TranscriptEvent {
            text: "partial words".to_string(),
            is_final: false,
            confidence: None,
        })
    );
}

#[test]
fn test_parse_flat_text_field() {
    let parsed = parse_upstream_message(r#"{"text": "hello", "is_final": true}"#);
    assert_eq!(
        parsed,
        UpstreamMessage::Transcript(TranscriptEvent {
            text: "hello".to_string(),
            is_final: true,
            confidence: None,
        })
    );
}

#[test]
fn test_missing_is_final_defaults_to_interim() {
    let parsed = parse_upstream_message(r#"{"transcript": "hello"}"#);
    match parsed {
        UpstreamMessage::Transcript(event) => assert!(!event.is_final),
        other => panic!("expected a transcript, got {:?}", other),
    }
}

#[test]
fn test_empty_transcript_is_ignored() {
    // Providers emit keep-alive results with empty transcripts
    let parsed = parse_upstream_message(
        r#"{"channel": {"alternatives": [{"transcript": ""}]}, "is_final": false}"#,
    );
    assert_eq!(parsed, UpstreamMessage::Ignored);
}

#[test]
fn test_unrecognized_message_is_ignored() {
    assert_eq!(
        parse_upstream_message(r#"{"type": "metadata", "duration": 1.5}"#),
        UpstreamMessage::Ignored
    );
    assert_eq!(parse_upstream_message("not json at all"), UpstreamMessage::Ignored);
}

#[test]
fn test_error_field_is_surfaced() {
    let parsed = parse_upstream_message(r#"{"error": "invalid api key"}"#);
    assert_eq!(parsed, UpstreamMessage::Error("invalid api key".to_string()));
}

#[test]
fn test_transcript_payload_shape() {
    let payload = TranscriptPayload {
        transcript: "hello".to_string(),
        is_final: true,
    };

    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains("\"transcript\":\"hello\""));
    assert!(json.contains("\"is_final\":true"));
}

#[test]
fn test_error_payload_shape() {
    let payload = ErrorPayload {
        error: "something broke".to_string(),
    };

    let json = serde_json::to_string(&payload).unwrap();
    assert_eq!(json, r#"{"error":"something broke"}"#);
}

#[test]
fn test_status_payload_values() {
    assert_eq!(StatusPayload::connecting().status, "connecting_upstream");
    assert_eq!(StatusPayload::connected().status, "upstream_connected");
    assert_eq!(StatusPayload::reconnected().status, "upstream_reconnected");
}

#[test]
fn test_client_audio_command_decodes_base64() {
    let pcm: Vec<u8> = vec![0, 1, 2, 3, 255];
    let encoded = base64::engine::general_purpose::STANDARD.encode(&pcm);
    let raw = format!(r#"{{"audio": "{}"}}"#, encoded);

    assert_eq!(parse_client_text(&raw), ClientCommand::Audio(pcm));
}

#[test]
fn test_client_end_command() {
    assert_eq!(parse_client_text(r#"{"action": "end"}"#), ClientCommand::End);
}

#[test]
fn test_client_garbage_is_ignored() {
    assert_eq!(parse_client_text("not json"), ClientCommand::Ignored);
    assert_eq!(
        parse_client_text(r#"{"audio": "%%% not base64 %%%"}"#),
        ClientCommand::Ignored
    );
    assert_eq!(parse_client_text(r#"{"audio": ""}"#), ClientCommand::Ignored);
    assert_eq!(
        parse_client_text(r#"{"action": "pause"}"#),
        ClientCommand::Ignored
    );
}
