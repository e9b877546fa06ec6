//! StarShop Admin Panel
//!
//! Operator control surface over the wallet ledger: allow-list roles,
//! callback command parsing, record queries, and transition dispatch.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod command;
pub mod error;
pub mod panel;
pub mod roles;

// Re-exports
pub use command::AdminCommand;
pub use error::{Error, Result};
pub use panel::{AdminPanel, Reply, UserOverview};
pub use roles::{AdminDirectory, Role};
