use super::state::AppState;
use crate::relay::{RelaySession, RelayUpdate};
use crate::upstream::messages::parse_client_text;
use crate::upstream::{AudioFrame, ClientCommand, ErrorPayload, StatusPayload, TranscriptPayload};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// GET /ws/transcribe/:session_id
/// Accept a client audio stream and relay it through the recognition service
pub async fn ws_transcribe(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(state, session_id, socket))
}

async fn handle_stream(state: AppState, session_id: String, socket: WebSocket) {
    info!("Client connected for session {}", session_id);

    let (mut client_tx, mut client_rx) = socket.split();

    let _ = send_json(&mut client_tx, &StatusPayload::connecting()).await;

    // Open the upstream link before the session exists; a failed open
    // leaves no session behind
    let link = match state.connector.connect().await {
        Ok(link) => link,
        Err(e) => {
            warn!("Upstream connect failed for session {}: {}", session_id, e);
            let _ = send_json(
                &mut client_tx,
                &ErrorPayload {
                    error: e.to_string(),
                },
            )
            .await;
            let _ = client_tx.close().await;
            return;
        }
    };

    let _ = send_json(&mut client_tx, &StatusPayload::connected()).await;

    let session = state.store.create(&session_id).await;
    let settings = state.config.relay_settings(&session_id);
    let (relay, updates) = RelaySession::start(settings, state.connector.clone(), link, session);

    // Outbound path: relay updates → client socket
    let writer = tokio::spawn(write_updates(client_tx, updates));

    // Inbound path: client socket → relay; a stopped relay (fatal upstream
    // failure) unblocks this even if the client goes quiet
    tokio::select! {
        _ = read_frames(&relay, &mut client_rx, &session_id) => {}
        _ = relay.stopped() => {
            debug!("Relay stopped for session {}", session_id);
        }
    }

    relay.shutdown().await;
    state.store.end(&session_id).await;

    // The update channel closes with the relay, ending the writer
    if let Ok(mut client_tx) = writer.await {
        let _ = client_tx.close().await;
    }

    info!("Session {} closed", session_id);
}

/// Pump client messages into the relay until the client is done
async fn read_frames(
    relay: &RelaySession,
    client_rx: &mut SplitStream<WebSocket>,
    session_id: &str,
) {
    while let Some(message) = client_rx.next().await {
        match message {
            Ok(Message::Binary(data)) => {
                if relay.send_frame(AudioFrame::new(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Text(text)) => match parse_client_text(&text) {
                ClientCommand::Audio(data) => {
                    if relay.send_frame(AudioFrame::new(data)).await.is_err() {
                        break;
                    }
                }
                ClientCommand::End => {
                    info!("Client ended session {}", session_id);
                    break;
                }
                ClientCommand::Ignored => {
                    debug!("Ignoring client text message for session {}", session_id);
                }
            },
            Ok(Message::Close(_)) | Err(_) => break,
            // Ping/pong is answered by the websocket layer
            Ok(_) => {}
        }
    }
}

/// Forward relay updates to the client until the relay stops
///
/// A fatal update is the last message the client sees before close.
async fn write_updates(
    mut client_tx: SplitSink<WebSocket, Message>,
    mut updates: mpsc::Receiver<RelayUpdate>,
) -> SplitSink<WebSocket, Message> {
    while let Some(update) = updates.recv().await {
        let sent = match update {
            RelayUpdate::Transcript { text, is_final } => {
                send_json(
                    &mut client_tx,
                    &TranscriptPayload {
                        transcript: text,
                        is_final,
                    },
                )
                .await
            }
            RelayUpdate::Status(status) => {
                send_json(&mut client_tx, &StatusPayload { status }).await
            }
            RelayUpdate::Fatal(error) => {
                let _ = send_json(&mut client_tx, &ErrorPayload { error }).await;
                break;
            }
        };

        if sent.is_err() {
            break;
        }
    }

    client_tx
}

async fn send_json<T: Serialize>(
    client_tx: &mut SplitSink<WebSocket, Message>,
    payload: &T,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(payload).unwrap_or_default();
    client_tx.send(Message::Text(text)).await
}
