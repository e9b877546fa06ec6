//! Request types for the storefront surface

use serde::{Deserialize, Serialize};
use wallet_core::{DepositMethod, UserId};

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentChoice {
    /// Pay from the main balance (escrowed until the order settles)
    Balance,
    /// Pay with stars (spent immediately)
    Stars,
    /// Redeem against the premium entitlement
    Premium,
}

/// Purchase request as received from the client surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Buying user
    pub user_id: UserId,

    /// Catalog package id
    pub package_id: i64,

    /// Chosen payment method
    pub method: PaymentChoice,

    /// Free-text input for the fulfilment operator
    pub user_input: String,

    /// Proof attachment reference from the upload collaborator
    pub proof: Option<String>,
}

/// Deposit request as received from the client surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Claiming user
    pub user_id: UserId,

    /// Claimed amount
    pub amount: rust_decimal::Decimal,

    /// Funding method
    pub method: DepositMethod,

    /// Transaction hash or pay order id
    pub reference: String,

    /// Proof attachment reference
    pub proof: Option<String>,
}
