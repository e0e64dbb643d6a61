//! Recording protocol engine for tests.
//!
//! # Why a recording engine?
//!
//! A real [`ProtocolEngine`] owns a socket and a handshake state machine;
//! driving one in tests would need a live VNC server.  The `RecordingEngine`
//! replaces every call with in-memory recording: each invocation is pushed
//! into a `Mutex<Vec<...>>` so test assertions can inspect exactly what the
//! session sent and in what order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail` before a call to simulate engine failures.  This lets
//! tests exercise the session's error paths (a failed start, a failed send)
//! without a broken transport.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use vncview_core::{ButtonMask, PixelFormat};

use super::{EngineError, ProtocolEngine};

/// A protocol engine that records all calls without any I/O.
///
/// Records live in `Mutex<Vec<...>>` fields so the engine can be shared
/// across threads behind an `Arc`, exactly as the session shares a real one.
#[derive(Default)]
pub struct RecordingEngine {
    /// Number of `start_connection` calls.
    pub starts: AtomicUsize,
    /// Number of `close_connection` calls.
    pub closes: AtomicUsize,
    /// Each format passed to `set_pixel_format`.
    pub pixel_formats: Mutex<Vec<PixelFormat>>,
    /// Each (x, y, mask bits) tuple passed to `send_pointer_event`.
    pub pointer_events: Mutex<Vec<(u16, u16, u8)>>,
    /// Each (keysym, down) pair passed to `send_key_event`.
    pub key_events: Mutex<Vec<(u32, bool)>>,
    /// When `true`, every fallible method returns an [`EngineError`].
    pub should_fail: AtomicBool,
}

impl RecordingEngine {
    /// Creates an engine with empty records and `should_fail` unset.
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&self) -> bool {
        self.should_fail.load(Ordering::Relaxed)
    }
}

impl ProtocolEngine for RecordingEngine {
    fn start_connection(&self) -> Result<(), EngineError> {
        if self.fail() {
            return Err(EngineError::Connect("recording engine failure".into()));
        }
        self.starts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn close_connection(&self) {
        self.closes.fetch_add(1, Ordering::Relaxed);
    }

    fn set_pixel_format(&self, format: &PixelFormat) -> Result<(), EngineError> {
        if self.fail() {
            return Err(EngineError::NotConnected);
        }
        self.pixel_formats.lock().unwrap().push(*format);
        Ok(())
    }

    fn send_pointer_event(&self, x: u16, y: u16, buttons: ButtonMask) -> Result<(), EngineError> {
        if self.fail() {
            return Err(EngineError::Send {
                kind: "pointer",
                reason: "recording engine failure".into(),
            });
        }
        self.pointer_events.lock().unwrap().push((x, y, buttons.bits()));
        Ok(())
    }

    fn send_key_event(&self, keysym: u32, down: bool) -> Result<(), EngineError> {
        if self.fail() {
            return Err(EngineError::Send {
                kind: "key",
                reason: "recording engine failure".into(),
            });
        }
        self.key_events.lock().unwrap().push((keysym, down));
        Ok(())
    }
}
