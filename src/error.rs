//! Error types for the commentary engine
//!
//! The engine core is infallible by construction (bad requests degrade to
//! logged no-ops), so the error surface is limited to configuration
//! loading and validation.

use thiserror::Error;

/// Errors produced while building an engine from external input.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration value failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
