// src/utils/error.rs
use std::io;
use thiserror::Error;

/// Main error type for the line miner
///
/// Covers configuration, input, randomness, output and task failures.
/// Whether an error ends a single job or the whole session is decided by
/// [`MinerError::is_fatal`].
#[derive(Error, Debug)]
pub enum MinerError {
    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Standard I/O operation errors (reading input, writing templates)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// The random source could not produce a nonce
    #[error("Nonce generation failed: {0}")]
    NonceError(String),

    /// Writing an event to the output sink failed
    #[error("Output sink error: {0}")]
    SinkError(String),

    /// A job was asked to do something its lifecycle forbids
    #[error("Job error: {0}")]
    JobError(String),

    /// Async task execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

impl MinerError {
    /// Returns `true` for errors that must stop the whole session
    ///
    /// A broken output stream leaves nothing to report to, so sink failures
    /// end the process. Everything else stays local to the job that hit it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MinerError::SinkError(_))
    }
}

/// Converts hex decoding errors into MinerError
///
/// Used when a nonce supplied for verification is not valid hex.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}

/// Converts randomness failures into MinerError
impl From<rand::Error> for MinerError {
    fn from(e: rand::Error) -> Self {
        MinerError::NonceError(e.to_string())
    }
}

/// Converts async task join errors into MinerError
///
/// A job task that panicked surfaces here when its outcome is collected.
impl From<tokio::task::JoinError> for MinerError {
    fn from(e: tokio::task::JoinError) -> Self {
        MinerError::TaskError(format!("Async task failed: {}", e))
    }
}
