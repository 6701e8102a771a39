//! Error types for pjournal.

use thiserror::Error;

/// Top-level result type for pjournal operations.
pub type Result<T> = std::result::Result<T, PjError>;

/// Top-level error type for pjournal.
#[derive(Debug, Error)]
pub enum PjError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("git error: {0}")]
    Git(String),

    #[error("failed to read {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while loading `.pjournal.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("unknown lint schema '{0}': expected 'v4' or 'legacy'")]
    UnknownSchema(String),
}
