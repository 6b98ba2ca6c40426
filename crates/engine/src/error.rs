//! Error types for the engine crate.

use feed_model::ViewError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a filtering session
///
/// Per-post and per-pass failures are handled inside the scheduler; only
/// conditions the loop cannot recover from surface here.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The view handle is permanently invalid
    #[error("View lost: {0}")]
    ViewLost(#[source] ViewError),

    /// The view kept failing for too many consecutive attempts
    #[error("{count} consecutive {operation} failures, last: {last}")]
    TooManyFailures {
        operation: &'static str,
        count: u32,
        #[source]
        last: ViewError,
    },
}

/// Errors that can occur while loading the engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Config parsed but its values are unusable
    #[error("Invalid config: {0}")]
    Invalid(String),
}
