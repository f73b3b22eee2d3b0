//! Error types for the settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Bookkeeping error from the core stores
    #[error("Bookkeeping error: {0}")]
    Core(#[from] royalty_core::Error),

    /// Caller lacks the required role or ownership
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The external ledger rejected a transfer
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Batch size exceeds the configured limit
    #[error("Batch of {requested} exceeds limit of {limit}")]
    BatchLimitExceeded {
        /// Deposits requested in one batch
        requested: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
