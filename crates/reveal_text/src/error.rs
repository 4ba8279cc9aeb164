//! Error types for reveal_text

use thiserror::Error;

/// Errors that can occur while mounting or configuring a text reveal
#[derive(Error, Debug)]
pub enum RevealError {
    /// A line animator was mounted outside of a `TextReveal`
    #[error("line animator must be mounted by a TextReveal container")]
    NotWrapped,

    /// A width string that is not a recognized length
    #[error("invalid length: {0:?}")]
    InvalidLength(String),

    /// Failed to parse a configuration file
    #[error("config parsing failed: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to read a configuration file
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reveal_text operations
pub type Result<T> = std::result::Result<T, RevealError>;
