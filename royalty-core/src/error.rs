//! Error types for royalty bookkeeping

use thiserror::Error;

/// Result type for royalty-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Royalty bookkeeping errors
#[derive(Error, Debug)]
pub enum Error {
    /// Percentage outside (0, 10000] basis points
    #[error("Invalid percentage: {0} bps (must be in 1..=10000)")]
    InvalidPercentage(u32),

    /// Null or otherwise unusable recipient address
    #[error("Invalid recipient address")]
    InvalidRecipient,

    /// Empty split configuration
    #[error("Split configuration is empty")]
    EmptySplitList,

    /// Too many recipients for one table
    #[error("Split table recipient limit exceeded: {limit}")]
    TooManyRecipients {
        /// Configured per-table limit
        limit: usize,
    },

    /// Active percentages would sum past 100%
    #[error("Total allocation would exceed 100%: {0} bps")]
    TotalExceeds100Percent(u32),

    /// Recipient already holds an active split
    #[error("Recipient already has an active split: {0}")]
    RecipientAlreadyExists(String),

    /// Recipient has no active split
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// Primary owner cannot be removed from a split table
    #[error("Cannot remove primary owner: {0}")]
    CannotRemovePrimaryOwner(String),

    /// Split table is locked against mutation
    #[error("Splits are locked for entity {0}")]
    SplitsLocked(u64),

    /// Zero deposit amount
    #[error("Deposit amount must be non-zero")]
    InvalidAmount,

    /// Asset not on the allow-list
    #[error("Unsupported asset: {0}")]
    UnsupportedAsset(String),

    /// Unknown deposit id (0 is reserved and always fails)
    #[error("Deposit not found: {0}")]
    DepositNotFound(u64),

    /// Deposit was already distributed
    #[error("Deposit already distributed: {0}")]
    AlreadyDistributed(u64),

    /// Zero claimable balance for the (recipient, asset) pair
    #[error("No claimable balance for {recipient} in {asset}")]
    NoClaimableBalance {
        /// Recipient that attempted the claim
        recipient: String,
        /// Asset that was claimed
        asset: String,
    },

    /// Entity unknown to the owner registry
    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
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
