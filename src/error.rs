//! Error types for the cardiac cell kernel.
//!
//! Configuration problems are detected once, at setup time, before any
//! stepping begins. Numerical-domain problems inside the stepping loop are not
//! reported here.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unrecognized or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal configuration errors.
///
/// Every variant carries the offending value so the runner can report it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// No registered model carries this identifier
    #[error("unknown model identifier '{0}'")]
    UnknownModel(String),

    /// A requested modifier was not handled by any tier
    #[error("unrecognized {category} '{name}' for model '{model}'")]
    UnrecognizedModifier {
        category: String,
        name: String,
        model: String,
    },

    /// Dose-like proportion outside [0, 1]
    #[error("{what} proportion {value} is outside [0, 1]")]
    InvalidProportion { what: String, value: f64 },

    /// Non-positive or non-finite time setting
    #[error("invalid timing setting {what} = {value}")]
    InvalidTiming { what: String, value: f64 },

    /// Two settings that cannot be combined
    #[error("{first} conflicts with {second}")]
    Conflict { first: String, second: String },
}
