//! Live relay session management
//!
//! This module provides the per-session relay that binds one client audio
//! stream to one upstream recognition link:
//! - `RelaySession`: facade the ingress drives (send frames in, read
//!   updates out, shut down)
//! - `LinkSupervisor`: pumps audio up and transcript events down, and
//!   reconnects with bounded-retry backoff when the link drops
//! - `FrameBuffer`: bounded buffer holding audio across reconnection gaps
//!
//! Both relay directions run concurrently for the lifetime of the session;
//! closing the frame path is the shutdown signal.

mod buffer;
mod config;
mod session;
mod supervisor;

pub use buffer::FrameBuffer;
pub use config::{RelaySettings, RetryPolicy};
pub use session::RelaySession;
pub use supervisor::RelayUpdate;
