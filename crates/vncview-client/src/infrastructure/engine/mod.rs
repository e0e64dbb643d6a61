//! The protocol-engine boundary.
//!
//! The RFB protocol engine (handshake, security negotiation, encoding
//! decode, transport) lives outside this crate.  The session sees it
//! through two halves:
//!
//! - [`ProtocolEngine`]: the methods the session invokes (start/close the
//!   connection, request a pixel format, send input events).  All sends are
//!   fire-and-forget, one call per event, in call order.
//! - [`EngineEvent`]: the callbacks the engine delivers from its own
//!   execution context (its own thread or task).  Engines hand these to the
//!   session either by calling
//!   [`VncSession::handle_engine_event`](crate::application::session::VncSession::handle_engine_event)
//!   directly or by pushing them onto an mpsc channel drained by
//!   [`spawn_event_pump`].
//!
//! Rectangle updates arrive *already decoded* as raw bytes of the negotiated
//! pixel format; `pixels.len()` must equal `width * height * 4` for the
//! fixed 32-bit format.  A violation is a malformed update and closes the
//! session.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use vncview_core::{ButtonMask, PixelFormat};

use crate::application::session::VncSession;

pub mod mock;

/// Errors surfaced by a protocol engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The connection could not be started.
    #[error("failed to start connection: {0}")]
    Connect(String),

    /// An outbound message could not be sent.
    #[error("failed to send {kind} message: {reason}")]
    Send { kind: &'static str, reason: String },

    /// The engine has no active connection.
    #[error("protocol engine is not connected")]
    NotConnected,
}

/// The operations the session invokes on the protocol engine.
///
/// Implementations must be callable from any thread; the session treats
/// every call as fire-and-forget and never retries.
#[cfg_attr(test, mockall::automock)]
pub trait ProtocolEngine: Send + Sync {
    /// Begins the connect/handshake sequence.
    fn start_connection(&self) -> Result<(), EngineError>;

    /// Tears the connection down.  Must be idempotent.
    fn close_connection(&self);

    /// Requests the given pixel format from the server.
    fn set_pixel_format(&self, format: &PixelFormat) -> Result<(), EngineError>;

    /// Sends one protocol pointer event.
    fn send_pointer_event(&self, x: u16, y: u16, buttons: ButtonMask) -> Result<(), EngineError>;

    /// Sends one protocol key event.
    fn send_key_event(&self, keysym: u32, down: bool) -> Result<(), EngineError>;
}

/// Callbacks delivered by the protocol engine to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Handshake complete; the server reported its screen dimensions.
    ConnectionMade { width: u32, height: u32 },
    /// One decoded rectangle of new pixel content.
    RectangleUpdate {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// The current framebuffer-update message is complete.
    UpdateFinished,
    /// The server renegotiated its screen dimensions mid-session.
    DesktopResized { width: u32, height: u32 },
    /// The connection failed or was closed by the remote side.
    ConnectionLost { reason: String },
}

/// Spawns the dispatch loop draining engine events into the session.
///
/// The task exits when every sender half of the channel is dropped, which is
/// how engines signal that no further callbacks can arrive.
pub fn spawn_event_pump(
    session: Arc<VncSession>,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            session.handle_engine_event(event);
        }
        debug!(session = %session.session_id(), "engine event channel closed, pump exiting");
    })
}
