//! Actor-based concurrency for the wallet ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! every balance mutation and status transition is handled by one logical
//! writer task, fed by a bounded mailbox. Two concurrent purchases, a
//! purchase racing a deposit approval, or a double-clicked approve button
//! all serialize through the mailbox, so no command ever observes a stale
//! balance and the compare-and-set status guards run race-free.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │        Storefront / Admin panel (async callers)       │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ WalletHandle (Clone)
//!                       ▼
//!               mpsc::channel (bounded)
//!                       │
//! ┌─────────────────────▼────────────────────────────────┐
//! │              WalletActor (single task)                │
//! │   load record(s) → check preconditions → mutate →     │
//! │          Storage commit (atomic WriteBatch)           │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::{
    ids::{self, TokenGenerator},
    metrics::Metrics,
    referral,
    types::{
        Deposit, DepositAction, DepositDraft, DepositStatus, DepositToken, Order, OrderAction,
        OrderDraft, OrderStatus, OrderToken, Payment, Referral, Transition, User, UserId,
    },
    Error, Result, Storage,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the wallet actor
pub enum WalletMessage {
    /// Create the user on first contact, or return the existing record
    RegisterUser {
        /// Platform identity
        user_id: UserId,
        /// Handle, may be empty
        username: String,
        /// Display name, may be empty
        first_name: String,
        /// Referral code supplied at signup, if any
        referred_by_code: Option<String>,
        /// Reply channel
        response: oneshot::Sender<Result<User>>,
    },

    /// Place an order, moving funds per the payment variant
    PlaceOrder {
        /// Validated draft
        draft: OrderDraft,
        /// Reply channel
        response: oneshot::Sender<Result<Order>>,
    },

    /// Record a deposit claim, no balance effect
    SubmitDeposit {
        /// Validated draft
        draft: DepositDraft,
        /// Reply channel
        response: oneshot::Sender<Result<Deposit>>,
    },

    /// Operator transition on an order
    TransitionOrder {
        /// Order token
        token: OrderToken,
        /// Requested action
        action: OrderAction,
        /// Referral reward configured at dispatch time
        referral_reward: Decimal,
        /// Reply channel
        response: oneshot::Sender<Result<Transition<Order>>>,
    },

    /// Operator transition on a deposit
    TransitionDeposit {
        /// Deposit token
        token: DepositToken,
        /// Requested action
        action: DepositAction,
        /// Reply channel
        response: oneshot::Sender<Result<Transition<Deposit>>>,
    },

    /// Move earned rewards into the spendable balance
    TransferReferral {
        /// Owning user
        user_id: UserId,
        /// Amount to move
        amount: Decimal,
        /// Reply channel
        response: oneshot::Sender<Result<User>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes wallet messages
pub struct WalletActor {
    /// Storage backend
    storage: Arc<Storage>,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<WalletMessage>,

    /// Token generator for order/deposit ids
    tokens: TokenGenerator,

    /// Metrics collector
    metrics: Metrics,
}

impl WalletActor {
    /// Create new actor
    pub fn new(
        storage: Arc<Storage>,
        mailbox: mpsc::Receiver<WalletMessage>,
        metrics: Metrics,
    ) -> Self {
        Self {
            storage,
            mailbox,
            tokens: TokenGenerator::new(),
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                WalletMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: WalletMessage) {
        let timer = self.metrics.command_duration.start_timer();
        match msg {
            WalletMessage::RegisterUser {
                user_id,
                username,
                first_name,
                referred_by_code,
                response,
            } => {
                let result =
                    self.handle_register_user(user_id, username, first_name, referred_by_code);
                let _ = response.send(result);
            }

            WalletMessage::PlaceOrder { draft, response } => {
                let result = self.handle_place_order(draft);
                let _ = response.send(result);
            }

            WalletMessage::SubmitDeposit { draft, response } => {
                let result = self.handle_submit_deposit(draft);
                let _ = response.send(result);
            }

            WalletMessage::TransitionOrder {
                token,
                action,
                referral_reward,
                response,
            } => {
                let result = self.handle_transition_order(&token, action, referral_reward);
                let _ = response.send(result);
            }

            WalletMessage::TransitionDeposit {
                token,
                action,
                response,
            } => {
                let result = self.handle_transition_deposit(&token, action);
                let _ = response.send(result);
            }

            WalletMessage::TransferReferral {
                user_id,
                amount,
                response,
            } => {
                let result = self.handle_transfer_referral(user_id, amount);
                let _ = response.send(result);
            }

            WalletMessage::Shutdown => {
                // Handled in main loop
            }
        }
        timer.observe_duration();
    }

    fn handle_register_user(
        &mut self,
        user_id: UserId,
        username: String,
        first_name: String,
        referred_by_code: Option<String>,
    ) -> Result<User> {
        if let Some(existing) = self.storage.user(user_id)? {
            return Ok(existing);
        }

        let referred_by =
            referral::resolve_referrer(&self.storage, referred_by_code.as_deref(), user_id)?;
        let now = Utc::now();
        let user = User {
            user_id,
            username,
            first_name,
            main: Decimal::ZERO,
            hold: Decimal::ZERO,
            referral: Decimal::ZERO,
            stars: 0,
            premium: false,
            referral_code: self.unique_referral_code()?,
            referred_by,
            first_order_completed: false,
            joined_at: now,
        };
        let link = referred_by.map(|referrer| referral::new_link(referrer, user_id, now));

        self.storage.create_user(&user, link.as_ref())?;
        self.metrics.users_registered.inc();

        tracing::info!(
            user = %user_id,
            referred_by = ?referred_by,
            "User registered"
        );
        Ok(user)
    }

    fn handle_place_order(&mut self, draft: OrderDraft) -> Result<Order> {
        let mut user = self
            .storage
            .user(draft.user_id)?
            .ok_or(Error::UserNotFound(draft.user_id))?;

        // Precondition checks and the balance move, under the single writer
        match &draft.payment {
            Payment::Balance { amount } => {
                if user.main < *amount {
                    return Err(Error::InsufficientBalance {
                        available: user.main,
                        required: *amount,
                    });
                }
                user.main -= *amount;
                user.hold += *amount;
            }
            Payment::Stars { amount } => {
                if user.stars < *amount {
                    return Err(Error::InsufficientStars {
                        available: user.stars,
                        required: *amount,
                    });
                }
                user.stars -= *amount;
            }
            Payment::Premium => {
                if !user.premium {
                    return Err(Error::PremiumRequired(user.user_id));
                }
            }
        }

        let token = self.unique_order_token()?;
        let now = Utc::now();
        let order = Order {
            token,
            user_id: draft.user_id,
            package_id: draft.package_id,
            package_name: draft.package_name,
            payment: draft.payment,
            user_input: draft.user_input,
            proof: draft.proof,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.storage.create_order(&order, &user)?;
        self.metrics.orders_placed.inc();

        tracing::info!(
            order = %order.token,
            user = %order.user_id,
            method = order.payment.method(),
            "Order placed"
        );
        Ok(order)
    }

    fn handle_submit_deposit(&mut self, draft: DepositDraft) -> Result<Deposit> {
        if self.storage.user(draft.user_id)?.is_none() {
            return Err(Error::UserNotFound(draft.user_id));
        }

        let token = self.unique_deposit_token()?;
        let now = Utc::now();
        let deposit = Deposit {
            token,
            user_id: draft.user_id,
            amount: draft.amount,
            method: draft.method,
            reference: draft.reference.trim().to_string(),
            proof: draft.proof,
            status: DepositStatus::Processing,
            created_at: now,
            updated_at: now,
        };

        self.storage.create_deposit(&deposit)?;
        self.metrics.deposits_submitted.inc();

        tracing::info!(
            deposit = %deposit.token,
            user = %deposit.user_id,
            method = %deposit.method,
            "Deposit submitted"
        );
        Ok(deposit)
    }

    fn handle_transition_order(
        &mut self,
        token: &OrderToken,
        action: OrderAction,
        referral_reward: Decimal,
    ) -> Result<Transition<Order>> {
        let mut order = self
            .storage
            .order(token)?
            .ok_or_else(|| Error::OrderNotFound(token.as_str().to_string()))?;

        // Compare-and-set guard: terminal records never move again
        if order.status.is_terminal() {
            return Ok(Transition::AlreadyProcessed(order));
        }

        let previous_status = order.status;
        order.status = action.target();
        order.updated_at = Utc::now();

        match action {
            OrderAction::Processing => {
                self.storage
                    .commit_order_transition(&order, previous_status, &[], None)?;
            }
            OrderAction::Success => {
                self.apply_order_success(&order, previous_status, referral_reward)?;
                self.metrics.orders_completed.inc();
            }
            OrderAction::Cancel => {
                self.apply_order_cancel(&order, previous_status)?;
                self.metrics.orders_cancelled.inc();
            }
        }

        tracing::info!(
            order = %order.token,
            action = action.as_str(),
            "Order transitioned"
        );
        Ok(Transition::Applied(order))
    }

    /// Release escrow, mark the first completed order, pay the referral
    /// reward at most once
    fn apply_order_success(
        &mut self,
        order: &Order,
        previous_status: OrderStatus,
        referral_reward: Decimal,
    ) -> Result<()> {
        let mut user = self
            .storage
            .user(order.user_id)?
            .ok_or(Error::UserNotFound(order.user_id))?;

        if let Payment::Balance { amount } = &order.payment {
            if user.hold < *amount {
                return Err(Error::InvariantViolation(format!(
                    "hold {} does not cover order {} amount {}",
                    user.hold, order.token, amount
                )));
            }
            // Escrow released: the funds are spent, not returned to main
            user.hold -= *amount;
        }

        let mut referrer: Option<User> = None;
        let mut link_update: Option<Referral> = None;
        if !user.first_order_completed {
            user.first_order_completed = true;

            if user.referred_by.is_some() {
                if let Some(mut link) = self.storage.referral_by_referred(user.user_id)? {
                    if !link.rewarded {
                        if let Some(mut referring_user) = self.storage.user(link.referrer_id)? {
                            referral::apply_reward(
                                &mut referring_user,
                                &mut link,
                                referral_reward,
                            );
                            self.metrics.referral_rewards.inc();
                            tracing::info!(
                                referrer = %link.referrer_id,
                                referred = %link.referred_id,
                                reward = %referral_reward,
                                "Referral reward paid"
                            );
                            referrer = Some(referring_user);
                            link_update = Some(link);
                        }
                    }
                }
            }
        }

        let mut touched: Vec<&User> = vec![&user];
        if let Some(ref referring_user) = referrer {
            touched.push(referring_user);
        }
        self.storage.commit_order_transition(
            order,
            previous_status,
            &touched,
            link_update.as_ref(),
        )
    }

    /// Reverse escrow: the full amount returns to the spendable balance
    fn apply_order_cancel(&mut self, order: &Order, previous_status: OrderStatus) -> Result<()> {
        match &order.payment {
            Payment::Balance { amount } => {
                let mut user = self
                    .storage
                    .user(order.user_id)?
                    .ok_or(Error::UserNotFound(order.user_id))?;
                if user.hold < *amount {
                    return Err(Error::InvariantViolation(format!(
                        "hold {} does not cover order {} amount {}",
                        user.hold, order.token, amount
                    )));
                }
                user.hold -= *amount;
                user.main += *amount;
                self.storage
                    .commit_order_transition(order, previous_status, &[&user], None)
            }
            // Stars are spent at purchase time and premium orders carry no
            // charge, so cancellation is status-only for both
            Payment::Stars { .. } | Payment::Premium => self
                .storage
                .commit_order_transition(order, previous_status, &[], None),
        }
    }

    fn handle_transition_deposit(
        &mut self,
        token: &DepositToken,
        action: DepositAction,
    ) -> Result<Transition<Deposit>> {
        let mut deposit = self
            .storage
            .deposit(token)?
            .ok_or_else(|| Error::DepositNotFound(token.as_str().to_string()))?;

        if deposit.status.is_terminal() {
            return Ok(Transition::AlreadyProcessed(deposit));
        }

        let previous_status = deposit.status;
        deposit.status = action.target();
        deposit.updated_at = Utc::now();

        match action {
            DepositAction::Approve => {
                let mut user = self
                    .storage
                    .user(deposit.user_id)?
                    .ok_or(Error::UserNotFound(deposit.user_id))?;
                user.main += deposit.amount;
                self.storage
                    .commit_deposit_transition(&deposit, previous_status, Some(&user))?;
                self.metrics.deposits_approved.inc();
            }
            DepositAction::Reject => {
                self.storage
                    .commit_deposit_transition(&deposit, previous_status, None)?;
            }
        }

        tracing::info!(
            deposit = %deposit.token,
            action = action.as_str(),
            "Deposit transitioned"
        );
        Ok(Transition::Applied(deposit))
    }

    fn handle_transfer_referral(&mut self, user_id: UserId, amount: Decimal) -> Result<User> {
        let mut user = self
            .storage
            .user(user_id)?
            .ok_or(Error::UserNotFound(user_id))?;

        if user.referral < amount {
            return Err(Error::InsufficientReferralBalance {
                available: user.referral,
                required: amount,
            });
        }
        user.referral -= amount;
        user.main += amount;

        self.storage.put_user(&user)?;

        tracing::info!(user = %user_id, amount = %amount, "Referral balance transferred");
        Ok(user)
    }

    /// Generate an order token not yet present in storage
    ///
    /// The suffix wraps on long uptimes, so regenerate on the rare hit.
    fn unique_order_token(&self) -> Result<OrderToken> {
        loop {
            let token = self.tokens.order_token();
            if self.storage.order(&token)?.is_none() {
                return Ok(token);
            }
        }
    }

    /// Generate a deposit token not yet present in storage
    fn unique_deposit_token(&self) -> Result<DepositToken> {
        loop {
            let token = self.tokens.deposit_token();
            if self.storage.deposit(&token)?.is_none() {
                return Ok(token);
            }
        }
    }

    /// Generate a referral code not yet claimed by another user
    fn unique_referral_code(&self) -> Result<String> {
        loop {
            let code = ids::referral_code();
            if self.storage.user_by_referral_code(&code)?.is_none() {
                return Ok(code);
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct WalletHandle {
    sender: mpsc::Sender<WalletMessage>,
}

impl WalletHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<WalletMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> WalletMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Create the user on first contact, or return the existing record
    pub async fn register_user(
        &self,
        user_id: UserId,
        username: String,
        first_name: String,
        referred_by_code: Option<String>,
    ) -> Result<User> {
        self.request(|response| WalletMessage::RegisterUser {
            user_id,
            username,
            first_name,
            referred_by_code,
            response,
        })
        .await
    }

    /// Place an order
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Order> {
        self.request(|response| WalletMessage::PlaceOrder { draft, response })
            .await
    }

    /// Record a deposit claim
    pub async fn submit_deposit(&self, draft: DepositDraft) -> Result<Deposit> {
        self.request(|response| WalletMessage::SubmitDeposit { draft, response })
            .await
    }

    /// Operator transition on an order
    pub async fn transition_order(
        &self,
        token: OrderToken,
        action: OrderAction,
        referral_reward: Decimal,
    ) -> Result<Transition<Order>> {
        self.request(|response| WalletMessage::TransitionOrder {
            token,
            action,
            referral_reward,
            response,
        })
        .await
    }

    /// Operator transition on a deposit
    pub async fn transition_deposit(
        &self,
        token: DepositToken,
        action: DepositAction,
    ) -> Result<Transition<Deposit>> {
        self.request(|response| WalletMessage::TransitionDeposit {
            token,
            action,
            response,
        })
        .await
    }

    /// Move earned rewards into the spendable balance
    pub async fn transfer_referral(&self, user_id: UserId, amount: Decimal) -> Result<User> {
        self.request(|response| WalletMessage::TransferReferral {
            user_id,
            amount,
            response,
        })
        .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(WalletMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the wallet actor
pub fn spawn_wallet_actor(
    storage: Arc<Storage>,
    mailbox_capacity: usize,
    metrics: Metrics,
) -> WalletHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity);
    let actor = WalletActor::new(storage, rx, metrics);

    tokio::spawn(async move {
        actor.run().await;
    });

    WalletHandle::new(tx)
}
