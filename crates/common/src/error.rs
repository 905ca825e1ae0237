//! Error types for the Yantra scan controller.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YantraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid identifier range: {0}")]
    InvalidRange(String),

    #[error("Invalid proxy line '{line}': {reason}")]
    InvalidProxy { line: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Controller already started")]
    AlreadyStarted,

    #[error("Controller not started")]
    NotStarted,
}

/// Result type alias for Yantra operations.
pub type YantraResult<T> = Result<T, YantraError>;
