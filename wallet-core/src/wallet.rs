//! Main wallet orchestration layer
//!
//! This module ties together storage, the single-writer actor, and the
//! settings snapshot into a high-level API for the storefront and the
//! admin control surface.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet_core::{CachedSettings, Config, StaticSettings, Wallet};
//!
//! #[tokio::main]
//! async fn main() -> wallet_core::Result<()> {
//!     let settings = Arc::new(CachedSettings::new(Arc::new(StaticSettings::new())));
//!     let wallet = Wallet::open(Config::default(), settings).await?;
//!
//!     // let user = wallet.register_user(...).await?;
//!
//!     wallet.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_wallet_actor, WalletHandle},
    metrics::Metrics,
    referral,
    settings::CachedSettings,
    types::{
        Deposit, DepositAction, DepositDraft, DepositToken, Order, OrderAction, OrderDraft,
        OrderToken, ReferralOverview, Transition, User, UserId, WalletStats,
    },
    validate_currency_amount, Config, Result, Storage,
};
use std::sync::Arc;

/// Default page size for recent-record queries
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Main wallet interface
pub struct Wallet {
    /// Actor handle for mutations
    handle: WalletHandle,

    /// Direct storage access (for reads)
    storage: Arc<Storage>,

    /// Settings snapshot source
    settings: Arc<CachedSettings>,

    /// Metrics collector
    metrics: Metrics,
}

impl Wallet {
    /// Open wallet with configuration
    pub async fn open(config: Config, settings: Arc<CachedSettings>) -> Result<Self> {
        let storage = Arc::new(Storage::open(&config)?);
        let metrics = Metrics::default();
        let handle = spawn_wallet_actor(storage.clone(), config.mailbox_capacity, metrics.clone());

        Ok(Self {
            handle,
            storage,
            settings,
            metrics,
        })
    }

    /// Create the user on first contact, or return the existing record
    pub async fn register_user(
        &self,
        user_id: UserId,
        username: impl Into<String>,
        first_name: impl Into<String>,
        referred_by_code: Option<String>,
    ) -> Result<User> {
        self.handle
            .register_user(user_id, username.into(), first_name.into(), referred_by_code)
            .await
    }

    /// Place an order
    ///
    /// Validates the draft shape, then runs the precondition checks and
    /// the escrow move atomically inside the actor.
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Order> {
        draft.validate()?;
        self.handle.place_order(draft).await
    }

    /// Record a deposit claim; funds are credited only on approval
    pub async fn submit_deposit(&self, draft: DepositDraft) -> Result<Deposit> {
        draft.validate()?;
        self.handle.submit_deposit(draft).await
    }

    /// Operator transition on an order
    ///
    /// The referral reward rate is read from the current settings
    /// snapshot at dispatch time.
    pub async fn transition_order(
        &self,
        token: OrderToken,
        action: OrderAction,
    ) -> Result<Transition<Order>> {
        let reward = self.settings.snapshot().referral_reward;
        self.handle.transition_order(token, action, reward).await
    }

    /// Operator transition on a deposit
    pub async fn transition_deposit(
        &self,
        token: DepositToken,
        action: DepositAction,
    ) -> Result<Transition<Deposit>> {
        self.handle.transition_deposit(token, action).await
    }

    /// Move earned referral rewards into the spendable balance
    pub async fn transfer_referral(
        &self,
        user_id: UserId,
        amount: rust_decimal::Decimal,
    ) -> Result<User> {
        validate_currency_amount(amount)?;
        self.handle.transfer_referral(user_id, amount).await
    }

    // Queries (direct storage reads)

    /// Get user by id
    pub fn user(&self, user_id: UserId) -> Result<Option<User>> {
        self.storage.user(user_id)
    }

    /// Get order by token
    pub fn order(&self, token: &OrderToken) -> Result<Option<Order>> {
        self.storage.order(token)
    }

    /// Get deposit by token
    pub fn deposit(&self, token: &DepositToken) -> Result<Option<Deposit>> {
        self.storage.deposit(token)
    }

    /// Most recent orders, newest first
    pub fn recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        self.storage.recent_orders(limit)
    }

    /// Most recent deposits, newest first
    pub fn recent_deposits(&self, limit: usize) -> Result<Vec<Deposit>> {
        self.storage.recent_deposits(limit)
    }

    /// One user's most recent orders, newest first
    pub fn user_orders(&self, user_id: UserId, limit: usize) -> Result<Vec<Order>> {
        self.storage.user_orders(user_id, limit)
    }

    /// One user's most recent deposits, newest first
    pub fn user_deposits(&self, user_id: UserId, limit: usize) -> Result<Vec<Deposit>> {
        self.storage.user_deposits(user_id, limit)
    }

    /// Referral summary for one user
    pub fn referral_overview(&self, user_id: UserId) -> Result<Option<ReferralOverview>> {
        referral::overview(&self.storage, user_id)
    }

    /// Aggregate counters for the admin dashboard
    pub fn stats(&self) -> Result<WalletStats> {
        self.storage.stats()
    }

    /// Settings snapshot source shared with the other components
    pub fn settings(&self) -> &Arc<CachedSettings> {
        &self.settings
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Shutdown wallet
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").finish_non_exhaustive()
    }
}
