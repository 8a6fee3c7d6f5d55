use super::error::{ConnectError, LinkError};
use super::messages::{parse_upstream_message, TranscriptEvent, UpstreamMessage};
use crate::config::UpstreamConfig;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

/// Raw audio buffer forwarded verbatim to the recognition service
///
/// The relay treats frame content as opaque; the format (PCM16LE, sample
/// rate, channel count) is agreed with the provider when the link opens.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    pub data: Vec<u8>,
}

impl AudioFrame {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for AudioFrame {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// Sending half of an upstream recognition link
#[async_trait]
pub trait AudioSink: Send {
    /// Forward one audio frame to the service
    async fn send(&mut self, frame: &AudioFrame) -> Result<(), LinkError>;

    /// Best-effort clean close of the outbound stream
    async fn close(&mut self);
}

/// Receiving half of an upstream recognition link
#[async_trait]
pub trait EventStream: Send {
    /// Next transcript event, an error describing why the link failed, or
    /// None once the remote stream has ended
    async fn next_event(&mut self) -> Option<Result<TranscriptEvent, LinkError>>;
}

/// Both halves of a freshly opened link
pub type LinkPair = (Box<dyn AudioSink>, Box<dyn EventStream>);

/// Opens links to the recognition service
///
/// One link per call; a link is owned by exactly one relay session and is
/// torn down before any replacement is promoted.
#[async_trait]
pub trait RecognitionConnector: Send + Sync {
    async fn connect(&self) -> Result<LinkPair, ConnectError>;

    /// Connector name for logging
    fn name(&self) -> &str;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connector for JSON-over-websocket streaming ASR providers
pub struct WsConnector {
    url: String,
    api_key: String,
    sample_rate: u32,
    channels: u16,
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            sample_rate: config.sample_rate,
            channels: config.channels,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }

    /// Provider URL with the audio format fixed at open time
    fn request_url(&self) -> String {
        format!(
            "{}?encoding=linear16&sample_rate={}&channels={}",
            self.url, self.sample_rate, self.channels
        )
    }
}

#[async_trait]
impl RecognitionConnector for WsConnector {
    async fn connect(&self) -> Result<LinkPair, ConnectError> {
        if self.api_key.is_empty() {
            return Err(ConnectError::MissingCredential);
        }

        let mut request = self
            .request_url()
            .into_client_request()
            .map_err(|e| ConnectError::Handshake(e.to_string()))?;

        let auth = HeaderValue::from_str(&format!("Token {}", self.api_key))
            .map_err(|e| ConnectError::Handshake(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, auth);

        debug!("Connecting to recognition service at {}", self.url);

        let (stream, _response) = tokio::time::timeout(self.connect_timeout, connect_async(request))
            .await
            .map_err(|_| ConnectError::Timeout)?
            .map_err(|e| ConnectError::Handshake(e.to_string()))?;

        let (sink, stream) = stream.split();

        Ok((
            Box::new(WsAudioSink { sink }),
            Box::new(WsEventStream { stream }),
        ))
    }

    fn name(&self) -> &str {
        "websocket"
    }
}

struct WsAudioSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl AudioSink for WsAudioSink {
    async fn send(&mut self, frame: &AudioFrame) -> Result<(), LinkError> {
        self.sink
            .send(Message::Binary(frame.data.clone()))
            .await
            .map_err(|e| LinkError::ConnectionLost(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
        let _ = self.sink.flush().await;
    }
}

struct WsEventStream {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl EventStream for WsEventStream {
    async fn next_event(&mut self) -> Option<Result<TranscriptEvent, LinkError>> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => match parse_upstream_message(&text) {
                    UpstreamMessage::Transcript(event) => return Some(Ok(event)),
                    UpstreamMessage::Error(error) => {
                        return Some(Err(LinkError::Remote(error)))
                    }
                    UpstreamMessage::Ignored => {
                        debug!("Ignoring unrecognized upstream message");
                    }
                },
                Ok(Message::Close(_)) => {
                    return Some(Err(LinkError::ConnectionLost(
                        "closed by the recognition service".to_string(),
                    )))
                }
                // Binary frames and ping/pong carry nothing to relay
                Ok(_) => {}
                Err(e) => return Some(Err(LinkError::ConnectionLost(e.to_string()))),
            }
        }

        None
    }
}
