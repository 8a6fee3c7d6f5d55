use super::state::AppState;
use crate::summary::summarize_lines;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub session_id: String,
    pub summary: String,

    /// Which summarizer produced the text (always "local")
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /summarize
/// Summarize the stored transcript of a session
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    let session = match state.store.get(&req.session_id).await {
        Some(session) => session,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Session {} not found", req.session_id),
                }),
            )
                .into_response()
        }
    };

    let lines = session.text_lines().await;
    let summary = summarize_lines(&lines, &state.config.summary);

    info!(
        "Summarized session {} ({} transcript lines)",
        req.session_id,
        lines.len()
    );

    (
        StatusCode::OK,
        Json(SummarizeResponse {
            session_id: req.session_id,
            summary,
            source: "local".to_string(),
        }),
    )
        .into_response()
}

/// GET /sessions/:session_id/transcript
/// Get the accumulated transcript for a session
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&session_id).await {
        Some(session) => {
            let transcript = session.transcript().await;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:session_id/status
/// Get a point-in-time snapshot of a session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&session_id).await {
        Some(session) => {
            let info = session.info().await;
            (StatusCode::OK, Json(info)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
