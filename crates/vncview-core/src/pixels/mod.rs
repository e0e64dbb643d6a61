//! Raw pixel storage: the negotiated pixel format and the 2D pixel buffer
//! that rectangle updates are blitted into.
//!
//! Everything in this module is deliberately dumb: no locking, no lifecycle,
//! no protocol knowledge.  The [`crate::framebuffer::FramebufferStore`] owns
//! a [`PixelBuffer`] exclusively and layers the concurrency contract on top.

pub mod buffer;
pub mod format;

pub use buffer::{BufferError, PixelBuffer};
pub use format::PixelFormat;
