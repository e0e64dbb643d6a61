//! The framebuffer store: the synchronization point between the network side
//! and the render side.
//!
//! See [`store::FramebufferStore`] for the main type.

pub mod store;

pub use store::{FramebufferStore, Snapshot, StoreError};
