//! # vncview-core
//!
//! Shared library for VNCView containing the client-side framebuffer state,
//! viewport mapping math, frame composition, and input event translation.
//!
//! This crate is the pure half of the client: it has zero dependencies on OS
//! APIs, sockets, or UI frameworks.  The protocol engine (RFB handshake,
//! encoding decode, transport) and the presentation surface both live outside
//! it and talk to it through plain Rust types.
//!
//! # Architecture overview (for beginners)
//!
//! A VNC viewer mirrors a remote screen: the server pushes *rectangle
//! updates* (patches of new pixel content for sub-regions of the screen) and
//! the viewer keeps a local copy of the full framebuffer up to date.  At the
//! same time the user's mouse and keyboard events must be translated into
//! protocol-level pointer and key messages and sent back.
//!
//! This crate defines the pieces that make that work:
//!
//! - **`pixels`** – The raw 2D pixel store ([`PixelBuffer`]) with a fixed,
//!   negotiated [`PixelFormat`], and the bounds-checked sub-rectangle blit
//!   that rectangle updates are applied through.
//!
//! - **`framebuffer`** – The [`FramebufferStore`]: the synchronization point
//!   between the network side (which mutates a back buffer) and the render
//!   side (which needs a torn-free snapshot at arbitrary times).
//!
//! - **`viewport`** – Stateless aspect-ratio-preserving scale/offset math
//!   between remote pixel space and the local viewport (letterboxing), plus
//!   the inverse mapping used to translate local cursor positions.
//!
//! - **`render`** – Composition of a snapshot into a display-ready frame:
//!   scaled, centered, margins filled black.
//!
//! - **`input`** – Protocol-space pointer/key event types, the pointer
//!   button-mask transition function, and the wheel-click convention.
//!
//! - **`keymap`** – Translation from a toolkit-independent local key
//!   representation to X11 keysyms, the symbolic key identifiers the RFB
//!   protocol uses.

pub mod framebuffer;
pub mod input;
pub mod keymap;
pub mod pixels;
pub mod render;
pub mod viewport;

// Re-export the most-used types at the crate root so callers can write
// `vncview_core::FramebufferStore` instead of the full path.
pub use framebuffer::{FramebufferStore, Snapshot, StoreError};
pub use input::{ButtonMask, InputEncoder, InputEvent, KeyEvent, PointerButton, PointerEvent};
pub use keymap::{LocalKey, NamedKey};
pub use pixels::{BufferError, PixelBuffer, PixelFormat};
pub use render::{Frame, ScaleFilter};
pub use viewport::{local_to_remote, scale_to_fit, FitTransform};
