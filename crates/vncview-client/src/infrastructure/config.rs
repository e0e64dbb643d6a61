//! TOML-based session configuration.
//!
//! The embedding application decides where configuration lives (a file, a
//! settings store, hard-coded defaults); this module only defines the schema
//! and the TOML (de)serialization.  Example:
//!
//! ```toml
//! read_only = true
//! scale_filter = "bilinear"
//! ```
//!
//! Every field carries a serde default so an empty document (or one written
//! by an older version) still parses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vncview_core::render::ScaleFilter;

/// Error type for configuration parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML content could not be parsed.
    #[error("failed to parse session config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize session config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Per-session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// When set, the presentation adapter must not forward any input; the
    /// session additionally drops input calls defensively.
    #[serde(default)]
    pub read_only: bool,

    /// Scale filter used when composing frames for the viewport.
    #[serde(default)]
    pub scale_filter: ScaleFilter,
}

impl SessionConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown field
    /// values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Serializes the configuration to TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] when serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
