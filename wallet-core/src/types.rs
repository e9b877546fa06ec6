//! Core types for the wallet ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (Decimal for money, integers for stars)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Numeric user identity assigned by the chat platform
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(i64);

impl UserId {
    /// Create new user ID
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get as raw integer
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Big-endian key bytes for storage
    pub fn key_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable order token ("ORD" + timestamp-derived digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderToken(String);

impl OrderToken {
    /// Create new order token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable deposit token ("DEP" + timestamp-derived digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositToken(String);

impl DepositToken {
    /// Create new deposit token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepositToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User record with the three currency balances and the stars balance
///
/// Invariant: `main`, `hold`, `referral` and `stars` never go negative.
/// Every mutation runs as a single read-modify-write inside the wallet
/// actor, so concurrent requests cannot observe or commit stale balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Platform identity, unique
    pub user_id: UserId,

    /// Handle on the chat platform, may be empty
    pub username: String,

    /// Display name, may be empty
    pub first_name: String,

    /// Spendable balance
    pub main: Decimal,

    /// Funds reserved against pending orders (escrow)
    pub hold: Decimal,

    /// Earned referral rewards, transferable to `main` on request
    pub referral: Decimal,

    /// Platform-native stars balance
    pub stars: i64,

    /// Premium entitlement flag
    pub premium: bool,

    /// Unique code other users supply at signup to credit this user
    pub referral_code: String,

    /// Referrer, resolved from the code supplied at signup
    pub referred_by: Option<UserId>,

    /// Set once, when this user's first order reaches `Success`
    pub first_order_completed: bool,

    /// Signup timestamp
    pub joined_at: DateTime<Utc>,
}

/// How an order is paid
///
/// The charge and the method are a single closed variant: an order is
/// either a currency charge held in escrow, a stars charge spent at
/// purchase time, or a premium-entitlement purchase with no charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payment {
    /// Charge against `main`, escrowed in `hold` until the order settles
    Balance {
        /// Currency amount charged
        amount: Decimal,
    },
    /// Charge against the stars balance, final at purchase time
    Stars {
        /// Stars charged
        amount: i64,
    },
    /// No charge, the premium entitlement itself is the payment
    Premium,
}

impl Payment {
    /// Method tag for display and history
    pub fn method(&self) -> &'static str {
        match self {
            Payment::Balance { .. } => "balance",
            Payment::Stars { .. } => "stars",
            Payment::Premium => "premium",
        }
    }

    /// Currency amount of the charge, zero for stars and premium orders
    pub fn currency_amount(&self) -> Decimal {
        match self {
            Payment::Balance { amount } => *amount,
            _ => Decimal::ZERO,
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderStatus {
    /// Initial state
    Pending = 1,
    /// Operator picked the order up
    Processing = 2,
    /// Fulfilled (terminal)
    Success = 3,
    /// Cancelled and refunded where applicable (terminal)
    Cancel = 4,
}

impl OrderStatus {
    /// Check if no further transition is permitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Success | OrderStatus::Cancel)
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Success => "SUCCESS",
            OrderStatus::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator action on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    /// Mark as picked up, no balance effect
    Processing,
    /// Fulfil the order and release the escrowed funds
    Success,
    /// Cancel the order and refund escrowed funds to `main`
    Cancel,
}

impl OrderAction {
    /// Status this action transitions to
    pub fn target(&self) -> OrderStatus {
        match self {
            OrderAction::Processing => OrderStatus::Processing,
            OrderAction::Success => OrderStatus::Success,
            OrderAction::Cancel => OrderStatus::Cancel,
        }
    }

    /// Parse from the wire tag used in operator callbacks
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(OrderAction::Processing),
            "success" => Some(OrderAction::Success),
            "cancel" => Some(OrderAction::Cancel),
            _ => None,
        }
    }

    /// Wire tag used in operator callbacks
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Processing => "processing",
            OrderAction::Success => "success",
            OrderAction::Cancel => "cancel",
        }
    }
}

/// Order record
///
/// Package name and charge are denormalized so history survives catalog
/// edits. Immutable once the status is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique human-readable token
    pub token: OrderToken,

    /// Owning user
    pub user_id: UserId,

    /// Catalog package reference
    pub package_id: i64,

    /// Package name at purchase time
    pub package_name: String,

    /// Charge and payment method
    pub payment: Payment,

    /// Free-text input supplied by the user (account name, link, etc.)
    pub user_input: String,

    /// Opaque proof-of-payment attachment reference
    pub proof: Option<String>,

    /// Current status
    pub status: OrderStatus,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last status change timestamp
    pub updated_at: DateTime<Utc>,
}

/// Deposit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DepositStatus {
    /// Initial state, funds not yet credited
    Processing = 1,
    /// Operator approved, `main` credited (terminal)
    Approved = 2,
    /// Operator rejected, no balance effect (terminal)
    Rejected = 3,
}

impl DepositStatus {
    /// Check if no further transition is permitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, DepositStatus::Approved | DepositStatus::Rejected)
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Processing => "Processing",
            DepositStatus::Approved => "Approved",
            DepositStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator action on a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositAction {
    /// Credit `main` by the deposit amount
    Approve,
    /// Discard the claim, no balance effect
    Reject,
}

impl DepositAction {
    /// Status this action transitions to
    pub fn target(&self) -> DepositStatus {
        match self {
            DepositAction::Approve => DepositStatus::Approved,
            DepositAction::Reject => DepositStatus::Rejected,
        }
    }

    /// Parse from the wire tag used in operator callbacks
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(DepositAction::Approve),
            "reject" => Some(DepositAction::Reject),
            _ => None,
        }
    }

    /// Wire tag used in operator callbacks
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositAction::Approve => "approve",
            DepositAction::Reject => "reject",
        }
    }
}

/// Funding method for deposits
///
/// Deposits are self-reported and operator-attested, so each method only
/// carries the reference shape the operator needs to verify the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepositMethod {
    /// Binance Pay transfer, referenced by a numeric pay order id
    BinancePay,
    /// USDT on-chain transfer, referenced by a transaction hash
    Usdt,
    /// BNB on-chain transfer, referenced by a transaction hash
    Bnb,
}

impl DepositMethod {
    /// Minimum accepted amount for this method
    pub fn min_amount(&self) -> Decimal {
        match self {
            DepositMethod::BinancePay => Decimal::new(200, 2),
            DepositMethod::Usdt => Decimal::new(1000, 2),
            DepositMethod::Bnb => Decimal::new(100, 2),
        }
    }

    /// Whether the external reference must be all digits (pay order id)
    /// rather than a transaction hash
    pub fn reference_is_numeric(&self) -> bool {
        matches!(self, DepositMethod::BinancePay)
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositMethod::BinancePay => "Binance Pay",
            DepositMethod::Usdt => "USDT",
            DepositMethod::Bnb => "BNB",
        }
    }

    /// Parse from the display label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Binance Pay" => Some(DepositMethod::BinancePay),
            "USDT" => Some(DepositMethod::Usdt),
            "BNB" => Some(DepositMethod::Bnb),
            _ => None,
        }
    }
}

impl fmt::Display for DepositMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deposit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    /// Unique human-readable token
    pub token: DepositToken,

    /// Owning user
    pub user_id: UserId,

    /// Claimed amount
    pub amount: Decimal,

    /// Funding method
    pub method: DepositMethod,

    /// Transaction hash or pay order id, depending on method
    pub reference: String,

    /// Opaque proof-of-payment attachment reference
    pub proof: Option<String>,

    /// Current status
    pub status: DepositStatus,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last status change timestamp
    pub updated_at: DateTime<Utc>,
}

/// Link between a referrer and a referred user
///
/// Created at signup, rewarded at most once when the referred user's
/// first order reaches `Success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    /// Record id
    pub id: Uuid,

    /// User whose code was used
    pub referrer_id: UserId,

    /// User who signed up with the code
    pub referred_id: UserId,

    /// Reward paid, zero until rewarded
    pub reward_amount: Decimal,

    /// Reward already paid
    pub rewarded: bool,

    /// Signup timestamp
    pub created_at: DateTime<Utc>,
}

/// Outcome of an operator transition
///
/// A transition on an already-terminal record is a benign no-op, not an
/// error: the caller gets the record back with an explicit signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    /// The transition was applied
    Applied(T),
    /// The record was already terminal, nothing changed
    AlreadyProcessed(T),
}

impl<T> Transition<T> {
    /// The record after the transition attempt
    pub fn record(&self) -> &T {
        match self {
            Transition::Applied(record) | Transition::AlreadyProcessed(record) => record,
        }
    }

    /// Check whether the transition changed the record
    pub fn was_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}

/// Purchase request after catalog resolution, ready for the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Buying user
    pub user_id: UserId,

    /// Catalog package reference
    pub package_id: i64,

    /// Package name to denormalize into the order
    pub package_name: String,

    /// Charge and payment method
    pub payment: Payment,

    /// Free-text input, required non-empty
    pub user_input: String,

    /// Proof attachment reference, required
    pub proof: Option<String>,
}

impl OrderDraft {
    /// Shape validation, applied before the draft reaches the actor
    pub fn validate(&self) -> crate::Result<()> {
        if self.user_input.trim().is_empty() {
            return Err(crate::Error::Validation(
                "order input must not be empty".to_string(),
            ));
        }
        if self.proof.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err(crate::Error::Validation(
                "payment proof is required".to_string(),
            ));
        }
        match &self.payment {
            Payment::Balance { amount } => validate_currency_amount(*amount)?,
            Payment::Stars { amount } => {
                if *amount <= 0 {
                    return Err(crate::Error::Validation(
                        "stars charge must be positive".to_string(),
                    ));
                }
            }
            Payment::Premium => {}
        }
        Ok(())
    }
}

/// Deposit claim, ready for the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositDraft {
    /// Claiming user
    pub user_id: UserId,

    /// Claimed amount
    pub amount: Decimal,

    /// Funding method
    pub method: DepositMethod,

    /// Transaction hash or pay order id
    pub reference: String,

    /// Proof attachment reference
    pub proof: Option<String>,
}

impl DepositDraft {
    /// Shape validation, applied before the draft reaches the actor
    pub fn validate(&self) -> crate::Result<()> {
        validate_currency_amount(self.amount)?;
        if self.amount < self.method.min_amount() {
            return Err(crate::Error::Validation(format!(
                "minimum deposit via {} is {}",
                self.method,
                self.method.min_amount()
            )));
        }
        let reference = self.reference.trim();
        if reference.is_empty() {
            return Err(crate::Error::Validation(
                "transaction hash or order id is required".to_string(),
            ));
        }
        if self.method.reference_is_numeric() && !reference.chars().all(|c| c.is_ascii_digit()) {
            return Err(crate::Error::Validation(
                "order id must contain digits only".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validate a currency amount: positive, at most 2 fraction digits
pub fn validate_currency_amount(amount: Decimal) -> crate::Result<()> {
    if amount <= Decimal::ZERO {
        return Err(crate::Error::Validation(
            "amount must be positive".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(crate::Error::Validation(
            "amount must have at most 2 decimal places".to_string(),
        ));
    }
    Ok(())
}

/// Aggregate counters for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStats {
    /// Users ever registered
    pub total_users: u64,

    /// Orders ever placed
    pub total_orders: u64,

    /// Orders still in `Pending`
    pub pending_orders: u64,

    /// Deposits still in `Processing`
    pub processing_deposits: u64,
}

/// Referral summary for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralOverview {
    /// The user's own referral code
    pub referral_code: String,

    /// Current referral balance
    pub referral_balance: Decimal,

    /// Users who signed up with the code
    pub total_referrals: u64,

    /// Referrals whose reward has been paid
    pub successful_referrals: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(OrderStatus::Success.is_terminal());
        assert!(OrderStatus::Cancel.is_terminal());
    }

    #[test]
    fn test_deposit_status_terminal() {
        assert!(!DepositStatus::Processing.is_terminal());
        assert!(DepositStatus::Approved.is_terminal());
        assert!(DepositStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_order_action_round_trip() {
        for action in [
            OrderAction::Processing,
            OrderAction::Success,
            OrderAction::Cancel,
        ] {
            assert_eq!(OrderAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(OrderAction::parse("refund"), None);
    }

    #[test]
    fn test_deposit_method_minimums() {
        assert_eq!(DepositMethod::BinancePay.min_amount(), Decimal::new(200, 2));
        assert_eq!(DepositMethod::Usdt.min_amount(), Decimal::new(1000, 2));
        assert_eq!(DepositMethod::Bnb.min_amount(), Decimal::new(100, 2));
        assert!(DepositMethod::BinancePay.reference_is_numeric());
        assert!(!DepositMethod::Usdt.reference_is_numeric());
    }

    #[test]
    fn test_payment_currency_amount() {
        let balance = Payment::Balance {
            amount: Decimal::new(2999, 2),
        };
        assert_eq!(balance.currency_amount(), Decimal::new(2999, 2));
        assert_eq!(Payment::Stars { amount: 100 }.currency_amount(), Decimal::ZERO);
        assert_eq!(Payment::Premium.currency_amount(), Decimal::ZERO);
        assert_eq!(balance.method(), "balance");
    }

    #[test]
    fn test_deposit_draft_validation() {
        let draft = DepositDraft {
            user_id: UserId::new(1),
            amount: Decimal::new(1000, 2),
            method: DepositMethod::Usdt,
            reference: "0xabc123".to_string(),
            proof: None,
        };
        assert!(draft.validate().is_ok());

        let below_min = DepositDraft {
            amount: Decimal::new(999, 2),
            ..draft.clone()
        };
        assert!(below_min.validate().is_err());

        let bad_reference = DepositDraft {
            method: DepositMethod::BinancePay,
            reference: "not-a-number".to_string(),
            ..draft.clone()
        };
        assert!(bad_reference.validate().is_err());

        let numeric_reference = DepositDraft {
            method: DepositMethod::BinancePay,
            reference: "123456789".to_string(),
            ..draft
        };
        assert!(numeric_reference.validate().is_ok());
    }

    #[test]
    fn test_order_draft_requires_input_and_proof() {
        let draft = OrderDraft {
            user_id: UserId::new(1),
            package_id: 1,
            package_name: "1000 Stars".to_string(),
            payment: Payment::Balance {
                amount: Decimal::new(500, 2),
            },
            user_input: "@buyer".to_string(),
            proof: Some("uploads/1.png".to_string()),
        };
        assert!(draft.validate().is_ok());

        let no_input = OrderDraft {
            user_input: "  ".to_string(),
            ..draft.clone()
        };
        assert!(no_input.validate().is_err());

        let no_proof = OrderDraft {
            proof: None,
            ..draft
        };
        assert!(no_proof.validate().is_err());
    }

    #[test]
    fn test_validate_currency_amount() {
        assert!(validate_currency_amount(Decimal::new(100, 2)).is_ok());
        assert!(validate_currency_amount(Decimal::ZERO).is_err());
        assert!(validate_currency_amount(Decimal::new(-100, 2)).is_err());
        assert!(validate_currency_amount(Decimal::new(12345, 3)).is_err());
    }
}
