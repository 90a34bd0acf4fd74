//! Error types for netgauge.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for netgauge operations.
pub type Result<T> = std::result::Result<T, NetgaugeError>;

/// Errors that can occur while loading or validating netgauge inputs.
#[derive(Error, Debug)]
pub enum NetgaugeError {
    /// Invalid estimator configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A string did not name a known variant.
    #[error(transparent)]
    Parse(#[from] VariantParseError),

    /// Failed to read a configuration file.
    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Out-of-range estimator configuration values.
///
/// The estimator itself never rejects these; they are reported to callers
/// that want to warn before producing degenerate (infinite or NaN) results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Compression rate outside `[0, 100]`.
    #[error("Compression rate {0}% is outside 0-100")]
    CompressionRateOutOfRange(f64),

    /// Zero or negative bandwidth.
    #[error("{direction} speed must be positive, got {value} Mbps")]
    NonPositiveSpeed {
        /// Which configured speed was invalid ("download" or "upload").
        direction: &'static str,
        /// The configured value.
        value: f64,
    },

    /// Negative latency.
    #[error("Network latency must not be negative, got {0} ms")]
    NegativeLatency(f64),
}

/// Error returned when parsing an unknown enum variant from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct VariantParseError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl VariantParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.into(),
            expected,
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
