//! Admin control surface
//!
//! Stateless query/command layer over the wallet ledger. Every mutating
//! action funnels through the wallet's transition contracts; this surface
//! never touches balances directly. Authorization failures produce
//! [`Reply::Ignored`] with no further detail.

use crate::{command::AdminCommand, roles::AdminDirectory, Result};
use std::sync::Arc;
use wallet_core::{
    Deposit, Order, Transition, User, UserId, Wallet, WalletStats, DEFAULT_PAGE_SIZE,
};

/// Support view: a user with their recent history
#[derive(Debug, Clone, PartialEq)]
pub struct UserOverview {
    /// The user record
    pub user: User,

    /// Last orders, newest first
    pub orders: Vec<Order>,

    /// Last deposits, newest first
    pub deposits: Vec<Deposit>,
}

/// Panel response
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Caller is not on the allow-list, or lacks the right for the action
    Ignored,

    /// Recent orders page
    Orders(Vec<Order>),

    /// Recent deposits page
    Deposits(Vec<Deposit>),

    /// Single order, if it exists
    Order(Option<Order>),

    /// Single deposit, if it exists
    Deposit(Option<Deposit>),

    /// Order transition outcome
    OrderTransition(Transition<Order>),

    /// Deposit transition outcome
    DepositTransition(Transition<Deposit>),

    /// Aggregate counters
    Stats(WalletStats),

    /// Support lookup result, if the user exists
    UserOverview(Option<UserOverview>),
}

/// Admin control surface over the wallet
pub struct AdminPanel {
    wallet: Arc<Wallet>,
}

impl AdminPanel {
    /// Create new panel
    pub fn new(wallet: Arc<Wallet>) -> Self {
        Self { wallet }
    }

    /// Current allow-list, resolved from the settings snapshot per call
    /// so a reload takes effect without rebuilding the panel
    fn directory(&self) -> AdminDirectory {
        AdminDirectory::from_snapshot(&self.wallet.settings().snapshot())
    }

    /// Handle an operator command
    ///
    /// Unknown callers and under-privileged mutations are silently
    /// ignored, indistinguishable from one another.
    pub async fn dispatch(&self, caller: UserId, command: AdminCommand) -> Result<Reply> {
        let Some(role) = self.directory().role_of(caller) else {
            tracing::debug!(caller = %caller, "Ignoring admin command from unknown caller");
            return Ok(Reply::Ignored);
        };

        match command {
            AdminCommand::ListOrders => Ok(Reply::Orders(
                self.wallet.recent_orders(DEFAULT_PAGE_SIZE)?,
            )),
            AdminCommand::ListDeposits => Ok(Reply::Deposits(
                self.wallet.recent_deposits(DEFAULT_PAGE_SIZE)?,
            )),
            AdminCommand::Stats => Ok(Reply::Stats(self.wallet.stats()?)),
            AdminCommand::UserLookup(user_id) => Ok(Reply::UserOverview(
                self.user_overview(user_id)?,
            )),
            AdminCommand::FetchOrder(token) => Ok(Reply::Order(self.wallet.order(&token)?)),
            AdminCommand::FetchDeposit(token) => {
                Ok(Reply::Deposit(self.wallet.deposit(&token)?))
            }
            AdminCommand::OrderAction { token, action } => {
                if !role.can_transition() {
                    tracing::debug!(caller = %caller, "Ignoring order action from view-only role");
                    return Ok(Reply::Ignored);
                }
                let outcome = self.wallet.transition_order(token, action).await?;
                Ok(Reply::OrderTransition(outcome))
            }
            AdminCommand::DepositAction { token, action } => {
                if !role.can_transition() {
                    tracing::debug!(caller = %caller, "Ignoring deposit action from view-only role");
                    return Ok(Reply::Ignored);
                }
                let outcome = self.wallet.transition_deposit(token, action).await?;
                Ok(Reply::DepositTransition(outcome))
            }
        }
    }

    /// Support lookup: the user plus their last orders and deposits
    fn user_overview(&self, user_id: UserId) -> Result<Option<UserOverview>> {
        let Some(user) = self.wallet.user(user_id)? else {
            return Ok(None);
        };
        Ok(Some(UserOverview {
            orders: self.wallet.user_orders(user_id, DEFAULT_PAGE_SIZE)?,
            deposits: self.wallet.user_deposits(user_id, DEFAULT_PAGE_SIZE)?,
            user,
        }))
    }
}

impl std::fmt::Debug for AdminPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminPanel").finish_non_exhaustive()
    }
}
