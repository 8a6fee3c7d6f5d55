// Unit tests for the session store: creation policy, append ordering,
// end-of-session freezing, and counters.

use loqa_transcribe::store::{SessionStatus, SessionStore, TranscriptLine};
use std::sync::Arc;

#[tokio::test]
async fn test_create_new_session() {
    let store = SessionStore::new();

    let session = store.create("abc123").await;

    assert_eq!(session.id(), "abc123");
    assert_eq!(session.status(), SessionStatus::Active);
    assert!(session.transcript().await.is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_reuses_active_session() {
    let store = SessionStore::new();

    let first = store.create("abc123").await;
    first
        .append(TranscriptLine::now("hello", true, None))
        .await;

    let second = store.create("abc123").await;

    assert!(
        Arc::ptr_eq(&first, &second),
        "an active id must map to the same session"
    );
    assert_eq!(second.line_count().await, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_after_end_starts_fresh_transcript() {
    let store = SessionStore::new();

    let first = store.create("abc123").await;
    first
        .append(TranscriptLine::now("old words", true, None))
        .await;
    store.end("abc123").await;

    let second = store.create("abc123").await;

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.status(), SessionStatus::Active);
    assert!(
        second.transcript().await.is_empty(),
        "a reused id must not leak the previous transcript"
    );
}

#[tokio::test]
async fn test_fresh_id_has_no_prior_data() {
    let store = SessionStore::new();

    let session = store.create("abc123").await;
    session
        .append(TranscriptLine::now("hello", true, None))
        .await;

    assert!(store.get("other-id").await.is_none());
}

#[tokio::test]
async fn test_append_preserves_arrival_order() {
    let store = SessionStore::new();
    let session = store.create("abc123").await;

    session
        .append(TranscriptLine::now("hel", false, None))
        .await;
    session
        .append(TranscriptLine::now("hello", true, Some(0.9)))
        .await;
    session
        .append(TranscriptLine::now("world", false, None))
        .await;

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0].text, "hel");
    assert!(!transcript[0].is_final);
    assert_eq!(transcript[1].text, "hello");
    assert!(transcript[1].is_final);
    assert_eq!(transcript[2].text, "world");

    assert_eq!(
        session.text_lines().await,
        vec!["hel".to_string(), "hello".to_string(), "world".to_string()]
    );
}

#[tokio::test]
async fn test_append_after_end_is_rejected() {
    let store = SessionStore::new();
    let session = store.create("abc123").await;

    session
        .append(TranscriptLine::now("hello", true, None))
        .await;
    store.end("abc123").await;

    assert_eq!(session.status(), SessionStatus::Ended);

    let appended = session
        .append(TranscriptLine::now("too late", true, None))
        .await;

    assert!(!appended);
    assert_eq!(session.line_count().await, 1, "ended transcripts are frozen");
}

#[tokio::test]
async fn test_end_keeps_session_readable() {
    let store = SessionStore::new();
    let session = store.create("abc123").await;
    session
        .append(TranscriptLine::now("hello", true, None))
        .await;

    store.end("abc123").await;

    let fetched = store.get("abc123").await.expect("session should remain stored");
    assert_eq!(fetched.status(), SessionStatus::Ended);
    assert_eq!(fetched.line_count().await, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_end_unknown_session_is_a_no_op() {
    let store = SessionStore::new();
    store.end("missing").await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_info_snapshot_reports_counters() {
    let store = SessionStore::new();
    let session = store.create("abc123").await;

    session
        .append(TranscriptLine::now("hello", true, None))
        .await;
    session.record_forwarded();
    session.record_forwarded();
    session.record_dropped();
    session.record_reconnect();

    let info = session.info().await;
    assert_eq!(info.session_id, "abc123");
    assert_eq!(info.status, SessionStatus::Active);
    assert_eq!(info.transcript_lines, 1);
    assert_eq!(info.frames_forwarded, 2);
    assert_eq!(info.frames_dropped, 1);
    assert_eq!(info.reconnects, 1);
}

#[test]
fn test_status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_value(SessionStatus::Active).unwrap(),
        serde_json::json!("active")
    );
    assert_eq!(
        serde_json::to_value(SessionStatus::Ended).unwrap(),
        serde_json::json!("ended")
    );
}
