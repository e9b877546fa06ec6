//! Error types for the admin panel

use thiserror::Error;

/// Result type for admin panel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Admin panel errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger rejected the request
    #[error(transparent)]
    Wallet(#[from] wallet_core::Error),
}
