//! StarShop Wallet Core
//!
//! Balance ledger and order/deposit state machines for the storefront
//! backend.
//!
//! # Architecture
//!
//! - **Single Writer**: one actor task owns every balance mutation, so
//!   concurrent purchases, approvals, and transfers cannot lose updates
//! - **Atomic Commits**: each state transition and its balance effects
//!   land in one RocksDB `WriteBatch`
//! - **Compare-and-Set Transitions**: terminal orders and deposits are
//!   immutable; a repeated operator action is a detected no-op
//!
//! # Invariants
//!
//! - `main >= 0`, `hold >= 0`, `referral >= 0`, `stars >= 0` for every
//!   user at all times
//! - A balance order's full lifecycle nets to: `main` down by the price
//!   on success, unchanged on cancel; `hold` unchanged either way
//! - A deposit credits `main` exactly once, on approval
//! - A referral reward is paid exactly once per referred user

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod config;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod referral;
pub mod settings;
pub mod storage;
pub mod types;
pub mod wallet;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use settings::{CachedSettings, SettingsSnapshot, SettingsSource, StaticSettings};
pub use storage::Storage;
pub use types::{
    validate_currency_amount, Deposit, DepositAction, DepositDraft, DepositMethod, DepositStatus,
    DepositToken, Order, OrderAction, OrderDraft, OrderStatus, OrderToken, Payment, Referral,
    ReferralOverview, Transition, User, UserId, WalletStats,
};
pub use wallet::{Wallet, DEFAULT_PAGE_SIZE};
