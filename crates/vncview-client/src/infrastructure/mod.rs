//! Infrastructure layer for the viewer.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `vncview_core`, but MUST NOT be imported by the application layer,
//! with one deliberate exception: the application layer names the
//! [`engine::ProtocolEngine`] trait and [`engine::EngineEvent`] contract,
//! which are boundary types rather than concrete adapters.
//!
//! # Sub-modules
//!
//! - **`engine`** – The protocol-engine boundary: the trait the session
//!   drives, the callback event type, the async event pump, and a recording
//!   mock for tests.  Concrete RFB engines (socket + handshake + decoders)
//!   live outside this repository and implement the trait.
//!
//! - **`config`** – TOML session configuration schema.

pub mod config;
pub mod engine;
