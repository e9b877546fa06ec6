//! Error types for the wallet ledger

use crate::types::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Request failed shape validation before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Deposit not found
    #[error("Deposit not found: {0}")]
    DepositNotFound(String),

    /// Main balance does not cover the requested charge
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        /// Spendable balance at the time of the check
        available: Decimal,
        /// Amount the charge required
        required: Decimal,
    },

    /// Stars balance does not cover the requested charge
    #[error("Insufficient stars: available {available}, required {required}")]
    InsufficientStars {
        /// Stars balance at the time of the check
        available: i64,
        /// Stars the charge required
        required: i64,
    },

    /// Referral balance does not cover the requested transfer
    #[error("Insufficient referral balance: available {available}, required {required}")]
    InsufficientReferralBalance {
        /// Referral balance at the time of the check
        available: Decimal,
        /// Amount the transfer required
        required: Decimal,
    },

    /// Package requires the premium entitlement the user does not have
    #[error("Premium entitlement required for user {0}")]
    PremiumRequired(UserId),

    /// Invariant violation (negative balance, dangling hold, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
