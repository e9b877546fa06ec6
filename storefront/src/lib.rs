//! StarShop Storefront
//!
//! Client-facing intake layer over the wallet ledger: catalog lookup,
//! purchase and deposit validation, and best-effort admin notifications.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod types;

// Re-exports
pub use catalog::{Catalog, JsonCatalog, Package};
pub use config::Config;
pub use engine::StorefrontEngine;
pub use error::{Error, Result};
pub use notify::{DispatchConfig, Dispatcher, NotificationSink, NotifyError};
pub use types::{DepositRequest, OrderRequest, PaymentChoice};
