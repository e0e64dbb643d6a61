//! Application layer use cases for the viewer.
//!
//! - **`session`** – The connection lifecycle state machine.  Routes engine
//!   callbacks into the framebuffer store, produces tear-free composites for
//!   the render path, and forwards translated input to the engine while
//!   owning the session-scoped button mask.

pub mod session;
