//! vncview-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! embedding applications share the same module tree.
//!
//! # What does vncview-client do? (for beginners)
//!
//! A VNC *viewer* shows the screen of a remote machine in a local window and
//! forwards the local mouse and keyboard to it.  This crate is the part
//! between the protocol engine and the window:
//!
//! 1. It drives the engine's lifecycle (`start`, pixel-format negotiation,
//!    `stop`) through a small state machine.
//! 2. It applies the engine's decoded rectangle updates to a mirrored
//!    framebuffer and publishes a consistent snapshot once per completed
//!    update batch.
//! 3. On demand it composes that snapshot into a letterboxed, viewport-sized
//!    frame the window can blit directly.
//! 4. It accumulates pointer button-mask state and sends ordered protocol
//!    input events, unless the session is read-only.
//!
//! What it deliberately does *not* contain: the RFB wire protocol (the
//! engine implements [`infrastructure::engine::ProtocolEngine`] and delivers
//! [`infrastructure::engine::EngineEvent`]s), and any windowing code (the
//! presentation layer consumes [`SessionEvent`]s and
//! [`vncview_core::render::Frame`]s).

/// Application layer: the session lifecycle use case.
pub mod application;

/// Infrastructure layer: engine boundary and configuration.
pub mod infrastructure;

pub use application::session::{
    CloseReason, ConnectionState, SessionError, SessionEvent, VncSession,
};
pub use infrastructure::config::{ConfigError, SessionConfig};
pub use infrastructure::engine::{
    mock::RecordingEngine, spawn_event_pump, EngineError, EngineEvent, ProtocolEngine,
};
