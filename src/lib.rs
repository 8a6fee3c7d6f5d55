pub mod config;
pub mod http;
pub mod relay;
pub mod store;
pub mod summary;
pub mod upstream;

pub use config::Config;
pub use http::{create_router, AppState};
pub use relay::{FrameBuffer, RelaySession, RelaySettings, RelayUpdate, RetryPolicy};
pub use store::{SessionHandle, SessionInfo, SessionStatus, SessionStore, TranscriptLine};
pub use summary::summarize_lines;
pub use upstream::{AudioFrame, ConnectError, LinkError, RecognitionConnector, WsConnector};
