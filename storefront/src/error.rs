//! Error types for the storefront engine

use thiserror::Error;

/// Result type for storefront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Storefront errors
#[derive(Error, Debug)]
pub enum Error {
    /// Request failed validation before reaching the ledger
    #[error("Validation error: {0}")]
    Validation(String),

    /// Package does not exist or is inactive
    #[error("Unknown package: {0}")]
    UnknownPackage(i64),

    /// Payment method cannot be used for this purchase
    #[error("Payment method not available: {0}")]
    MethodUnavailable(String),

    /// Catalog file could not be read or parsed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Ledger rejected the request
    #[error(transparent)]
    Wallet(#[from] wallet_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Catalog(err.to_string())
    }
}
