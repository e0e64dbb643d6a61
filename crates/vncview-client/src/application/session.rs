//! The viewer session: connection lifecycle state machine and event routing.
//!
//! `VncSession` is the coordination point between three concurrent concerns:
//!
//! 1. The protocol engine's callbacks (handshake done, rectangle update,
//!    update finished) arriving from the engine's own execution context.
//! 2. The render path, which pulls tear-free composites at arbitrary times.
//! 3. Local input, which must be translated into ordered protocol sends
//!    while accumulating pointer button-mask state.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start()──> Connecting ──ConnectionMade──> Established
//!                                                      │ ▲
//!                                      RectangleUpdate │ │ (self-loop)
//!                                                      ▼ │
//!                                  UpdateFinished ──> Streaming
//!
//! any state ──stop() / ConnectionLost──> Closed(reason)   [terminal]
//! ```
//!
//! `Closed` is terminal: a second `stop()` is a no-op, late engine callbacks
//! are dropped, and the render path keeps yielding the last composited frame
//! instead of panicking.  Retry/reconnect policy belongs to an outer
//! supervisor, not here.

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use vncview_core::framebuffer::FramebufferStore;
use vncview_core::input::{ButtonMask, InputEncoder, PointerButton};
use vncview_core::pixels::PixelFormat;
use vncview_core::render::{self, Frame};
use vncview_core::StoreError;

use crate::infrastructure::config::SessionConfig;
use crate::infrastructure::engine::{EngineError, EngineEvent, ProtocolEngine};

/// Why a session reached `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The local side called `stop()`.
    Requested,
    /// The engine reported a fatal condition (transport loss, handshake
    /// failure, malformed update stream).
    Engine(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Requested => write!(f, "stop requested"),
            CloseReason::Engine(reason) => write!(f, "engine: {reason}"),
        }
    }
}

/// Connection lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, not started.
    Idle,
    /// `start()` called; waiting for the handshake to complete.
    Connecting,
    /// Handshake done, framebuffer initialized, receiving the first batch.
    Established,
    /// At least one complete update batch has been published.
    Streaming,
    /// Terminal.
    Closed(CloseReason),
}

/// Notifications emitted to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The remote screen dimensions are known (after the handshake, and
    /// again after a server-side resize).  The presentation layer typically
    /// resizes its surface in response.
    SizeNegotiated { width: u32, height: u32 },
    /// A complete update batch was published; a repaint will observe the new
    /// generation.  Consumers render on this signal or on their own timer,
    /// whichever is less frequent, never mid-batch.
    FrameCompleted { generation: u64 },
    /// The session reached its terminal state.
    Closed { reason: CloseReason },
}

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested lifecycle transition is not allowed from the current
    /// state.
    #[error("invalid lifecycle transition: {0}")]
    InvalidTransition(&'static str),

    /// The engine failed the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A single viewer session.
///
/// All methods take `&self` and are callable from any thread; the session is
/// shared via `Arc` between the engine context, the render context, and the
/// input source.  Sessions are independent and share nothing.
pub struct VncSession {
    session_id: Uuid,
    config: SessionConfig,
    engine: Arc<dyn ProtocolEngine>,
    store: Arc<FramebufferStore>,
    state: Mutex<ConnectionState>,
    buttons: Mutex<ButtonMask>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl VncSession {
    /// Creates an idle session around the given engine.
    ///
    /// Returns the session and the receiver for its [`SessionEvent`]
    /// notifications.
    pub fn new(
        engine: Arc<dyn ProtocolEngine>,
        config: SessionConfig,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let session = Arc::new(Self {
            session_id: Uuid::new_v4(),
            config,
            engine,
            store: Arc::new(FramebufferStore::new()),
            state: Mutex::new(ConnectionState::Idle),
            buttons: Mutex::new(ButtonMask::EMPTY),
            events,
        });
        (session, events_rx)
    }

    /// This session's identifier, used in log output.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state.lock().unwrap().clone()
    }

    /// The framebuffer store backing this session.
    pub fn store(&self) -> &Arc<FramebufferStore> {
        &self.store
    }

    /// Whether the session was configured read-only.
    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Starts the underlying protocol engine.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] unless the session is `Idle`;
    /// [`SessionError::Engine`] when the engine fails to start, in which
    /// case the session is closed.
    pub fn start(&self) -> Result<(), SessionError> {
        {
            let mut state = self.state.lock().unwrap();
            if *state != ConnectionState::Idle {
                return Err(SessionError::InvalidTransition(
                    "start() requires an idle session",
                ));
            }
            *state = ConnectionState::Connecting;
        }
        info!(session = %self.session_id, "starting connection");

        if let Err(e) = self.engine.start_connection() {
            error!(session = %self.session_id, error = %e, "engine failed to start");
            self.close_with(CloseReason::Engine(e.to_string()));
            return Err(e.into());
        }
        Ok(())
    }

    /// Stops the session.  Safe to call from any thread, concurrently with
    /// in-flight updates; a second call on a closed session is a no-op.
    pub fn stop(&self) {
        self.close_with(CloseReason::Requested);
    }

    /// Routes one engine callback into the session.
    pub fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::ConnectionMade { width, height } => {
                self.on_connection_made(width, height);
            }
            EngineEvent::RectangleUpdate { x, y, width, height, pixels } => {
                self.on_rectangle_update(x, y, width, height, &pixels);
            }
            EngineEvent::UpdateFinished => self.on_update_finished(),
            EngineEvent::DesktopResized { width, height } => {
                self.on_desktop_resized(width, height);
            }
            EngineEvent::ConnectionLost { reason } => {
                warn!(session = %self.session_id, %reason, "connection lost");
                self.close_with(CloseReason::Engine(reason));
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Produces a tear-free, aspect-fit composite for the given viewport.
    ///
    /// Before the first complete update batch this is a defined blank state
    /// (all black); after `Closed` it keeps yielding the last published
    /// frame.  Returns `None` for zero-area viewports, which cannot be drawn.
    pub fn render(&self, viewport_w: u32, viewport_h: u32) -> Option<Frame> {
        match self.store.snapshot() {
            Some(snapshot) => render::compose_snapshot(
                &snapshot,
                viewport_w,
                viewport_h,
                self.config.scale_filter,
            ),
            None => render::blank_frame(viewport_w, viewport_h),
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Sends a pre-translated pointer event (remote-space coordinates and a
    /// complete button mask).
    pub fn pointer_event(&self, x: u16, y: u16, buttons: ButtonMask) {
        if !self.input_allowed("pointer") {
            return;
        }
        self.send_pointer(x, y, buttons);
    }

    /// Applies a button press/release to the session mask and sends the
    /// resulting pointer event.
    pub fn pointer_button(&self, button: PointerButton, pressed: bool, x: u16, y: u16) {
        if !self.input_allowed("pointer") {
            return;
        }
        let buttons = {
            let mut mask = self.buttons.lock().unwrap();
            *mask = InputEncoder::on_pointer_button(button, pressed, *mask);
            *mask
        };
        self.send_pointer(x, y, buttons);
    }

    /// Sends a move event carrying the currently held buttons.
    pub fn pointer_move(&self, x: u16, y: u16) {
        if !self.input_allowed("pointer") {
            return;
        }
        let mask = *self.buttons.lock().unwrap();
        let event = InputEncoder::on_pointer_move(x, y, mask);
        self.send_pointer(event.x, event.y, event.buttons);
    }

    /// Sends one wheel detent as the RFB press/release pair.
    pub fn wheel(&self, wheel: PointerButton, x: u16, y: u16) {
        if !self.input_allowed("pointer") {
            return;
        }
        let mask = *self.buttons.lock().unwrap();
        for event in InputEncoder::wheel_click(wheel, x, y, mask) {
            self.send_pointer(event.x, event.y, event.buttons);
        }
    }

    /// Sends a key press/release for the given keysym.
    pub fn key_event(&self, keysym: u32, down: bool) {
        if !self.input_allowed("key") {
            return;
        }
        let event = InputEncoder::on_key(keysym, down);
        if let Err(e) = self.engine.send_key_event(event.keysym, event.down) {
            warn!(session = %self.session_id, error = %e, "dropping key event");
        }
    }

    // ── Engine callback handlers ──────────────────────────────────────────────

    fn on_connection_made(&self, width: u32, height: u32) {
        {
            let state = self.state.lock().unwrap();
            match *state {
                ConnectionState::Connecting => {}
                ConnectionState::Closed(_) => return,
                _ => {
                    warn!(session = %self.session_id, state = ?*state,
                        "ignoring handshake completion in unexpected state");
                    return;
                }
            }
        }
        info!(session = %self.session_id, width, height, "handshake done");

        if let Err(e) = self.engine.set_pixel_format(&PixelFormat::rgb32()) {
            error!(session = %self.session_id, error = %e, "pixel format negotiation failed");
            self.close_with(CloseReason::Engine(e.to_string()));
            return;
        }
        if let Err(e) = self.store.initialize(width, height, PixelFormat::rgb32()) {
            error!(session = %self.session_id, error = %e, "framebuffer initialization failed");
            self.close_with(CloseReason::Engine(e.to_string()));
            return;
        }

        *self.state.lock().unwrap() = ConnectionState::Established;
        let _ = self.events.send(SessionEvent::SizeNegotiated { width, height });
    }

    fn on_rectangle_update(&self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        if !self.in_update_states("rectangle update") {
            return;
        }
        match self.store.apply_update(x, y, width, height, pixels) {
            Ok(()) => {}
            Err(StoreError::NotReady) => {
                warn!(session = %self.session_id, x, y, width, height,
                    "dropping rectangle update: framebuffer not ready");
            }
            Err(e) => {
                // Out-of-bounds or wrong-length rectangles mean the engine
                // violated its contract; the stream cannot be trusted.
                error!(session = %self.session_id, error = %e, "malformed rectangle update");
                self.close_with(CloseReason::Engine(format!(
                    "malformed rectangle update: {e}"
                )));
            }
        }
    }

    fn on_update_finished(&self) {
        if !self.in_update_states("update-finished") {
            return;
        }
        if let Some(generation) = self.store.mark_update_complete() {
            trace!(session = %self.session_id, generation, "update batch complete");
            *self.state.lock().unwrap() = ConnectionState::Streaming;
            let _ = self.events.send(SessionEvent::FrameCompleted { generation });
        }
    }

    fn on_desktop_resized(&self, width: u32, height: u32) {
        if !self.in_update_states("desktop resize") {
            return;
        }
        info!(session = %self.session_id, width, height, "server resized desktop");
        self.store.reset();
        if let Err(e) = self.store.initialize(width, height, PixelFormat::rgb32()) {
            error!(session = %self.session_id, error = %e, "reinitialization after resize failed");
            self.close_with(CloseReason::Engine(e.to_string()));
            return;
        }
        let _ = self.events.send(SessionEvent::SizeNegotiated { width, height });
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// `true` when updates may flow (Established/Streaming).  Events in other
    /// states are dropped: silently after `Closed`, loudly otherwise.
    fn in_update_states(&self, what: &str) -> bool {
        let state = self.state.lock().unwrap();
        match *state {
            ConnectionState::Established | ConnectionState::Streaming => true,
            ConnectionState::Closed(_) => {
                trace!(session = %self.session_id, what, "dropping event after close");
                false
            }
            _ => {
                warn!(session = %self.session_id, what, state = ?*state,
                    "dropping event in unexpected state");
                false
            }
        }
    }

    fn input_allowed(&self, kind: &str) -> bool {
        if self.config.read_only {
            debug!(session = %self.session_id, kind, "dropping input: session is read-only");
            return false;
        }
        if matches!(*self.state.lock().unwrap(), ConnectionState::Closed(_)) {
            debug!(session = %self.session_id, kind, "dropping input: session closed");
            return false;
        }
        true
    }

    fn send_pointer(&self, x: u16, y: u16, buttons: ButtonMask) {
        if let Err(e) = self.engine.send_pointer_event(x, y, buttons) {
            warn!(session = %self.session_id, error = %e, "dropping pointer event");
        }
    }

    /// Transitions to `Closed(reason)` exactly once and tears down shared
    /// resources.  Subsequent calls are no-ops.
    fn close_with(&self, reason: CloseReason) {
        {
            let mut state = self.state.lock().unwrap();
            if matches!(*state, ConnectionState::Closed(_)) {
                debug!(session = %self.session_id, "already closed");
                return;
            }
            *state = ConnectionState::Closed(reason.clone());
        }
        self.engine.close_connection();
        self.store.close();
        *self.buttons.lock().unwrap() = ButtonMask::EMPTY;
        info!(session = %self.session_id, %reason, "session closed");
        let _ = self.events.send(SessionEvent::Closed { reason });
    }
}
