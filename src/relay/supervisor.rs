use super::buffer::FrameBuffer;
use super::config::RelaySettings;
use crate::store::{SessionHandle, TranscriptLine};
use crate::upstream::{
    AudioFrame, AudioSink, EventStream, LinkError, LinkPair, RecognitionConnector,
    TranscriptEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Client-bound messages emitted by the relay
#[derive(Debug, Clone, PartialEq)]
pub enum RelayUpdate {
    /// A transcript event, already appended to the session log
    Transcript { text: String, is_final: bool },

    /// Upstream connection lifecycle notification
    Status(String),

    /// The session failed; exactly one of these precedes shutdown
    Fatal(String),
}

/// Upstream link phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkPhase {
    Connected,
    Reconnecting,
    Failed,
}

/// Why a pump round ended
enum PumpEnd {
    /// The frame path closed: client disconnect or explicit end
    ClientDone,
    /// The link dropped; worth reconnecting
    Transient,
    /// Unrecoverable failure
    Fatal(String),
}

enum FlushEnd {
    Done,
    Transient,
    Fatal(String),
}

enum ReconnectOutcome {
    Restored(LinkPair),
    ClientGone,
    Exhausted,
}

/// One step of the pump select loop
enum PumpStep {
    Frame(Option<AudioFrame>),
    Event(Option<Result<TranscriptEvent, LinkError>>),
}

/// Owns the upstream link for one session and keeps the logical stream
/// unbroken across reconnections
///
/// Audio frames arrive over the frame channel and are forwarded upstream in
/// order; transcript events are appended to the session and emitted over the
/// update channel. On a transient failure the old link is dropped, frames
/// are held in the outage buffer, and a replacement link is opened with
/// bounded-retry backoff. Closing the frame channel shuts the supervisor
/// down cleanly.
pub struct LinkSupervisor {
    settings: RelaySettings,
    connector: Arc<dyn RecognitionConnector>,
    session: Arc<SessionHandle>,
    frames_rx: mpsc::Receiver<AudioFrame>,
    updates_tx: mpsc::Sender<RelayUpdate>,
    buffer: FrameBuffer,
    phase: LinkPhase,
}

impl LinkSupervisor {
    pub fn new(
        settings: RelaySettings,
        connector: Arc<dyn RecognitionConnector>,
        session: Arc<SessionHandle>,
        frames_rx: mpsc::Receiver<AudioFrame>,
        updates_tx: mpsc::Sender<RelayUpdate>,
    ) -> Self {
        let buffer = FrameBuffer::new(settings.buffer_frames);
        Self {
            settings,
            connector,
            session,
            frames_rx,
            updates_tx,
            buffer,
            phase: LinkPhase::Connected,
        }
    }

    /// Drive the link until the client is done or the session fails
    pub async fn run(mut self, link: LinkPair) {
        let mut current = Some(link);

        loop {
            let (mut sink, mut events) = match current.take() {
                Some(pair) => pair,
                None => match self.reconnect().await {
                    ReconnectOutcome::Restored(pair) => {
                        self.session.record_reconnect();
                        let _ = self
                            .updates_tx
                            .send(RelayUpdate::Status("upstream_reconnected".to_string()))
                            .await;
                        pair
                    }
                    ReconnectOutcome::ClientGone => {
                        debug!(
                            "Client left session {} mid-reconnect",
                            self.settings.session_id
                        );
                        return;
                    }
                    ReconnectOutcome::Exhausted => {
                        self.phase = LinkPhase::Failed;
                        error!(
                            "Giving up on session {} after {} reconnect attempts",
                            self.settings.session_id, self.settings.retry.max_attempts
                        );
                        let _ = self
                            .updates_tx
                            .send(RelayUpdate::Fatal(
                                "upstream reconnection attempts exhausted".to_string(),
                            ))
                            .await;
                        return;
                    }
                },
            };
            self.phase = LinkPhase::Connected;
            debug!(
                "Session {} upstream link {:?}",
                self.settings.session_id, self.phase
            );

            // Drain the outage buffer in original order before new frames
            match self.flush(sink.as_mut()).await {
                FlushEnd::Done => {}
                FlushEnd::Transient => {
                    self.phase = LinkPhase::Reconnecting;
                    continue; // old link halves drop here
                }
                FlushEnd::Fatal(reason) => {
                    self.fail(reason).await;
                    return;
                }
            }

            match self.pump(sink.as_mut(), events.as_mut()).await {
                PumpEnd::ClientDone => {
                    debug!(
                        "Client finished session {}; closing upstream link",
                        self.settings.session_id
                    );
                    sink.close().await;
                    return;
                }
                PumpEnd::Transient => {
                    self.phase = LinkPhase::Reconnecting;
                    continue;
                }
                PumpEnd::Fatal(reason) => {
                    self.fail(reason).await;
                    return;
                }
            }
        }
    }

    /// Forward frames up and transcript events down until something stops
    async fn pump(
        &mut self,
        sink: &mut dyn AudioSink,
        events: &mut dyn EventStream,
    ) -> PumpEnd {
        loop {
            let step = tokio::select! {
                frame = self.frames_rx.recv() => PumpStep::Frame(frame),
                event = events.next_event() => PumpStep::Event(event),
            };

            match step {
                PumpStep::Frame(None) => return PumpEnd::ClientDone,
                PumpStep::Frame(Some(frame)) => {
                    if let Err(e) = sink.send(&frame).await {
                        if !e.is_transient() {
                            return PumpEnd::Fatal(e.to_string());
                        }
                        warn!(
                            "Audio send failed for session {}: {}",
                            self.settings.session_id, e
                        );
                        // Not lost: this frame heads the queue for the next link
                        if self.buffer.push(frame).is_some() {
                            self.session.record_dropped();
                        }
                        return PumpEnd::Transient;
                    }
                    self.session.record_forwarded();
                }
                PumpStep::Event(Some(Ok(event))) => {
                    if !self.relay_event(event).await {
                        return PumpEnd::ClientDone;
                    }
                }
                PumpStep::Event(Some(Err(e))) => {
                    if !e.is_transient() {
                        return PumpEnd::Fatal(e.to_string());
                    }
                    warn!(
                        "Upstream link failed for session {}: {}",
                        self.settings.session_id, e
                    );
                    return PumpEnd::Transient;
                }
                PumpStep::Event(None) => {
                    warn!(
                        "Upstream event stream ended for session {}",
                        self.settings.session_id
                    );
                    return PumpEnd::Transient;
                }
            }
        }
    }

    /// Append an event to the session log and emit it toward the client
    ///
    /// Returns false once the client side is gone.
    async fn relay_event(&mut self, event: TranscriptEvent) -> bool {
        let line = TranscriptLine::now(event.text.clone(), event.is_final, event.confidence);
        self.session.append(line).await;

        self.updates_tx
            .send(RelayUpdate::Transcript {
                text: event.text,
                is_final: event.is_final,
            })
            .await
            .is_ok()
    }

    /// Send buffered frames upstream in their original order
    async fn flush(&mut self, sink: &mut dyn AudioSink) -> FlushEnd {
        if self.buffer.is_empty() {
            return FlushEnd::Done;
        }

        info!(
            "Flushing {} buffered frames for session {}",
            self.buffer.len(),
            self.settings.session_id
        );

        while let Some(frame) = self.buffer.pop() {
            if let Err(e) = sink.send(&frame).await {
                if e.is_transient() {
                    self.buffer.restore(frame);
                    return FlushEnd::Transient;
                }
                return FlushEnd::Fatal(e.to_string());
            }
            self.session.record_forwarded();
        }

        FlushEnd::Done
    }

    /// Open a replacement link, backing off between attempts and buffering
    /// inbound audio in the meantime
    async fn reconnect(&mut self) -> ReconnectOutcome {
        let attempts = self.settings.retry.max_attempts;

        for attempt in 1..=attempts {
            let delay = self.settings.retry.delay(attempt);
            info!(
                "Reconnecting session {} to the recognition service (attempt {}/{}, backoff {:?})",
                self.settings.session_id, attempt, attempts, delay
            );

            if !self.buffer_while_waiting(delay).await {
                return ReconnectOutcome::ClientGone;
            }

            match self.connector.connect().await {
                Ok(pair) => {
                    info!(
                        "Upstream link restored for session {}",
                        self.settings.session_id
                    );
                    return ReconnectOutcome::Restored(pair);
                }
                Err(e) => {
                    warn!(
                        "Reconnect attempt {}/{} failed for session {}: {}",
                        attempt, attempts, self.settings.session_id, e
                    );
                }
            }
        }

        ReconnectOutcome::Exhausted
    }

    /// Hold inbound frames in the outage buffer while the backoff runs
    ///
    /// Returns false if the client went away.
    async fn buffer_while_waiting(&mut self, delay: Duration) -> bool {
        let wait = tokio::time::sleep(delay);
        tokio::pin!(wait);

        loop {
            tokio::select! {
                _ = &mut wait => return true,
                frame = self.frames_rx.recv() => match frame {
                    Some(frame) => {
                        if self.buffer.push(frame).is_some() {
                            self.session.record_dropped();
                        }
                    }
                    None => return false,
                },
            }
        }
    }

    async fn fail(&mut self, reason: String) {
        self.phase = LinkPhase::Failed;
        error!("Session {} failed: {}", self.settings.session_id, reason);
        let _ = self.updates_tx.send(RelayUpdate::Fatal(reason)).await;
    }
}
