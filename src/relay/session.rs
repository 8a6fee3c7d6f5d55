use super::config::RelaySettings;
use super::supervisor::{LinkSupervisor, RelayUpdate};
use crate::store::SessionHandle;
use crate::upstream::{AudioFrame, LinkPair, RecognitionConnector};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Frames queued between the ingress loop and the supervisor
const FRAME_QUEUE: usize = 32;

/// Updates queued between the supervisor and the client write loop
const UPDATE_QUEUE: usize = 64;

/// Per-session relay facade
///
/// Owns the supervisor task for one client connection. The ingress pushes
/// audio frames in with `send_frame` and drains client-bound events from
/// the update receiver returned by `start`; `shutdown` closes the frame
/// path and waits for the upstream link to be torn down.
pub struct RelaySession {
    session_id: String,
    frames_tx: mpsc::Sender<AudioFrame>,
    supervisor: JoinHandle<()>,
}

impl RelaySession {
    /// Start relaying over an already-open upstream link
    pub fn start(
        settings: RelaySettings,
        connector: Arc<dyn RecognitionConnector>,
        link: LinkPair,
        session: Arc<SessionHandle>,
    ) -> (Self, mpsc::Receiver<RelayUpdate>) {
        let (frames_tx, frames_rx) = mpsc::channel(FRAME_QUEUE);
        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_QUEUE);

        let session_id = settings.session_id.clone();
        let supervisor = LinkSupervisor::new(settings, connector, session, frames_rx, updates_tx);
        let handle = tokio::spawn(supervisor.run(link));

        info!("Relay started for session {}", session_id);

        (
            Self {
                session_id,
                frames_tx,
                supervisor: handle,
            },
            updates_rx,
        )
    }

    /// Hand one inbound audio frame to the relay
    ///
    /// Fails once the relay has stopped (fatal link error or exhausted
    /// reconnection attempts).
    pub async fn send_frame(&self, frame: AudioFrame) -> Result<()> {
        self.frames_tx
            .send(frame)
            .await
            .map_err(|_| anyhow!("relay for session {} has stopped", self.session_id))
    }

    /// Resolves once the relay has stopped accepting frames (fatal link
    /// error or exhausted reconnection attempts)
    pub async fn stopped(&self) {
        self.frames_tx.closed().await
    }

    /// Stop the relay and wait for the upstream link to close
    pub async fn shutdown(self) {
        drop(self.frames_tx);

        if let Err(e) = self.supervisor.await {
            error!(
                "Relay supervisor for session {} panicked: {}",
                self.session_id, e
            );
        }
    }
}
