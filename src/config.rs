//! # Reduce Configuration
//!
//! Runtime knobs shared by the drivers ([`reduce_all`](crate::reducer::reduce_all),
//! [`map_reduce`](crate::map_reduce::map_reduce)) and the [`Reader`](crate::reader::Reader).
//! Reducers themselves size their internal channels from the channels they
//! are handed, so this only matters at the outermost layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default capacity for channels created by the drivers.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Configuration for running reducers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
  /// Capacity of each channel created by a driver. Must be at least 1.
  pub buffer_size: usize,
  /// Optional name used to tag log events.
  pub name: Option<String>,
}

impl Default for ReduceConfig {
  fn default() -> Self {
    Self {
      buffer_size: DEFAULT_BUFFER_SIZE,
      name: None,
    }
  }
}

impl ReduceConfig {
  /// Parses a JSON document; absent keys keep their defaults.
  ///
  /// ```rust
  /// use logweave::config::ReduceConfig;
  ///
  /// let config = ReduceConfig::from_json(r#"{"buffer_size": 8}"#).unwrap();
  /// assert_eq!(config.buffer_size, 8);
  /// assert_eq!(config.name, None);
  /// ```
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Checks the invariants a deserialized configuration cannot enforce.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.buffer_size == 0 {
      return Err(ConfigError::ZeroBuffer);
    }
    Ok(())
  }

  /// Sets the channel capacity. Zero is bumped to one.
  pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
    self.buffer_size = buffer_size.max(1);
    self
  }

  /// Sets the name attached to log events.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Name used in log events, falling back to `"reduce"`.
  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("reduce")
  }
}
