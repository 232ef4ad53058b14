//! Error types for base address estimation.
//!
//! Every fallible library operation returns [`Result`], built on the
//! thiserror-derived [`BaseGuessError`].

use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for baseguess operations.
#[derive(Debug, Error)]
pub enum BaseGuessError {
    /// Opening, mapping or reading the image failed
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// A configuration value is outside the accepted set
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configuration file could not be decoded
    #[error("Configuration file error: {0}")]
    Config(#[from] serde_json::Error),

    /// No pointer correlated with any candidate string
    #[error("No base address candidates: {reason}")]
    EmptyResult { reason: String },
}

impl From<std::io::Error> for BaseGuessError {
    fn from(err: std::io::Error) -> Self {
        BaseGuessError::Io(IoError::StdIo(err))
    }
}

impl BaseGuessError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BaseGuessError::InvalidConfiguration(msg.into())
    }
}

/// Result type alias for baseguess operations
pub type Result<T> = std::result::Result<T, BaseGuessError>;
