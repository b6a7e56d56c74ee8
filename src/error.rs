//! # Error Types
//!
//! Errors are local to the edges of the system. Reducers never surface a
//! failure from `reduce`; they skip what they cannot read. The types here
//! describe those skippable failures plus the ones a caller sees when wiring
//! a source or loading configuration.

use thiserror::Error;

/// Failure to read a field from a [`Record`](crate::record::Record).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
  /// The record has no field with this name.
  #[error("field '{0}' not found")]
  Missing(String),
  /// The field exists but its value cannot be converted to the requested type.
  #[error("field '{name}' value '{value}' is not a valid {kind}")]
  Invalid {
    /// Name of the field.
    name: String,
    /// The raw value that failed to convert.
    value: String,
    /// The requested type, e.g. `"float"`.
    kind: &'static str,
  },
}

/// Errors produced while turning raw lines into records.
#[derive(Error, Debug)]
pub enum ReaderError {
  /// The format string could not be compiled into a line matcher.
  #[error("invalid log format '{format}': {source}")]
  Format {
    /// The offending format string.
    format: String,
    /// Underlying regex compilation error.
    #[source]
    source: regex::Error,
  },
  /// A line did not match the configured format.
  #[error("line does not match format: {line}")]
  Mismatch {
    /// The rejected line.
    line: String,
  },
  /// Reading from the underlying source failed.
  #[error("read error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors raised while loading a [`ReduceConfig`](crate::config::ReduceConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
  /// The configuration document is not valid JSON for this type.
  #[error("invalid configuration: {0}")]
  Parse(#[from] serde_json::Error),
  /// Channels need room for at least one record.
  #[error("buffer_size must be at least 1")]
  ZeroBuffer,
}
