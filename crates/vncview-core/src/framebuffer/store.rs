//! Tear-free framebuffer state shared between the update stream and the
//! render path.
//!
//! # The concurrency problem (for beginners)
//!
//! Two independent execution contexts touch the mirrored screen:
//!
//! - The protocol engine's context delivers rectangle updates, each mutating
//!   a sub-region of the pixel store.
//! - The render context wants a consistent full-frame picture at arbitrary
//!   times (a repaint, a timer tick).
//!
//! If the render side read the same bytes the network side writes, it could
//! observe a rectangle half-applied, i.e. visible tearing.  The store prevents
//! this with *publish-on-complete double buffering*:
//!
//! ```text
//! engine context                         render context
//! ──────────────                         ──────────────
//! apply_update ──> back buffer (Mutex)
//! apply_update ──> back buffer
//! mark_update_complete ─┐
//!                       └─> clone ──> published Snapshot <── snapshot()
//! ```
//!
//! The published snapshot only ever changes wholesale, at batch boundaries,
//! so a reader can never see a partially-applied batch.  Readers hold an
//! `Arc` to an immutable buffer and never contend with in-flight blits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::pixels::{BufferError, PixelBuffer, PixelFormat};

/// Errors reported by [`FramebufferStore`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// An update arrived before `initialize`.  Non-fatal: the caller logs
    /// the drop and the stream continues.
    #[error("framebuffer update arrived before initialization")]
    NotReady,

    /// `initialize` was called twice without an intervening `reset`.
    #[error("framebuffer store is already initialized")]
    AlreadyInitialized,

    /// The store was torn down; it cannot be initialized again.
    #[error("framebuffer store has been closed")]
    Closed,

    /// The underlying buffer operation failed (malformed rectangle).
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Lifecycle of the back buffer.
#[derive(Debug)]
enum BackBuffer {
    /// No dimensions negotiated yet; updates are dropped as [`StoreError::NotReady`].
    Uninitialized,
    /// Receiving updates.
    Ready(PixelBuffer),
    /// Session torn down; updates are silently discarded.
    Closed,
}

/// An immutable published frame: the back buffer's state as of the last
/// completed update batch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The frame pixels.  Shared read-only; never mutated after publication.
    pub buffer: Arc<PixelBuffer>,
    /// Monotonic batch counter, starting at 1 for the first published frame.
    pub generation: u64,
}

/// Owns the back buffer mutated by incoming rectangle updates and publishes
/// consistent snapshots for rendering.
///
/// All methods take `&self`; the store is shared between contexts via `Arc`.
#[derive(Debug, Default)]
pub struct FramebufferStore {
    back: Mutex<BackBuffer>,
    front: Mutex<Option<Snapshot>>,
    generation: AtomicU64,
}

impl Default for BackBuffer {
    fn default() -> Self {
        BackBuffer::Uninitialized
    }
}

impl FramebufferStore {
    /// Creates an uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the back buffer once the remote dimensions are known
    /// (post-handshake).
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyInitialized`] when called twice without a
    /// [`FramebufferStore::reset`], [`StoreError::Closed`] after teardown,
    /// and [`BufferError::InvalidDimension`] for unusable dimensions.
    pub fn initialize(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<(), StoreError> {
        let mut back = self.back.lock().unwrap();
        match *back {
            BackBuffer::Ready(_) => Err(StoreError::AlreadyInitialized),
            BackBuffer::Closed => Err(StoreError::Closed),
            BackBuffer::Uninitialized => {
                *back = BackBuffer::Ready(PixelBuffer::new(width, height, format)?);
                info!(width, height, "framebuffer initialized");
                Ok(())
            }
        }
    }

    /// Discards the back buffer so `initialize` can be called again with new
    /// dimensions (server-side resize renegotiation).
    ///
    /// The last published snapshot is retained: the render path keeps showing
    /// the previous complete frame until the first batch at the new size is
    /// published.
    pub fn reset(&self) {
        let mut back = self.back.lock().unwrap();
        if !matches!(*back, BackBuffer::Closed) {
            *back = BackBuffer::Uninitialized;
            debug!("framebuffer reset, awaiting new dimensions");
        }
    }

    /// Applies one decoded rectangle to the back buffer.
    ///
    /// After [`FramebufferStore::close`] this is a silent no-op: late
    /// callbacks from the engine must not error against torn-down state.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotReady`] before initialization (the caller logs and
    /// drops the update), or a [`BufferError`] for a malformed rectangle.
    pub fn apply_update(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), StoreError> {
        let mut back = self.back.lock().unwrap();
        match &mut *back {
            BackBuffer::Uninitialized => Err(StoreError::NotReady),
            BackBuffer::Closed => Ok(()),
            BackBuffer::Ready(buffer) => {
                trace!(x, y, width, height, "applying rectangle update");
                buffer.blit(x, y, width, height, pixels)?;
                Ok(())
            }
        }
    }

    /// Publishes the back buffer as the new visible snapshot.
    ///
    /// Called once per finished framebuffer-update message.  This is the only
    /// point at which the externally visible frame changes.  Returns the new
    /// generation number, or `None` when the store is uninitialized or closed.
    pub fn mark_update_complete(&self) -> Option<u64> {
        let back = self.back.lock().unwrap();
        let BackBuffer::Ready(buffer) = &*back else {
            return None;
        };
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let snapshot = Snapshot {
            buffer: Arc::new(buffer.clone()),
            generation,
        };
        *self.front.lock().unwrap() = Some(snapshot);
        trace!(generation, "update batch published");
        Some(generation)
    }

    /// The last published frame, or `None` before the first complete batch.
    ///
    /// Never contends with in-flight `apply_update` calls.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.front.lock().unwrap().clone()
    }

    /// Generation of the last published frame (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Back-buffer dimensions, when initialized.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match &*self.back.lock().unwrap() {
            BackBuffer::Ready(buffer) => Some((buffer.width(), buffer.height())),
            _ => None,
        }
    }

    /// Tears the store down.  Terminal: subsequent `apply_update` and
    /// `mark_update_complete` calls are no-ops, and `snapshot` keeps
    /// returning the last published frame.
    pub fn close(&self) {
        *self.back.lock().unwrap() = BackBuffer::Closed;
        debug!("framebuffer store closed");
    }
}
