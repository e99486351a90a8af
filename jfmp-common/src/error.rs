//! Common error types for JFMP

use thiserror::Error;

/// Common result type for JFMP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across JFMP crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
