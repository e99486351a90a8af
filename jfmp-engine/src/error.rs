//! Error types for jfmp-engine
//!
//! Only genuinely invalid caller input, configuration loading and the
//! playback-start failure cross the engine boundary. Capability lookups and
//! effect failures degrade to safe defaults instead of erroring.

use thiserror::Error;

/// Main error type for the playback engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or device profile loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed a track kind the engine does not know
    #[error("Invalid track kind: {0}")]
    InvalidTrackKind(String),

    /// Fallback cascade exhausted without finding a decoder
    #[error("No decoder available for {mime_type}")]
    NoDecoderAvailable { mime_type: String },

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Device profile could not be read
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using jfmp-engine Error
pub type Result<T> = std::result::Result<T, Error>;
