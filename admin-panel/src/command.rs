//! Operator command parsing
//!
//! Callback tokens map 1:1 to the transition and query contracts:
//! `order_<action>_<token>`, `deposit_<action>_<token>`,
//! `screenshot_order_<token>`, `screenshot_deposit_<token>`, plus the
//! dashboard buttons `admin_orders` and `admin_deposits`.

use wallet_core::{DepositAction, DepositToken, OrderAction, OrderToken, UserId};

/// A parsed operator command
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    /// Page of most recent orders
    ListOrders,

    /// Page of most recent deposits
    ListDeposits,

    /// Aggregate counters
    Stats,

    /// One user's record and recent history, for support
    UserLookup(UserId),

    /// Fetch one order (screenshot button)
    FetchOrder(OrderToken),

    /// Fetch one deposit (screenshot button)
    FetchDeposit(DepositToken),

    /// Transition an order
    OrderAction {
        /// Target order
        token: OrderToken,
        /// Requested action
        action: OrderAction,
    },

    /// Transition a deposit
    DepositAction {
        /// Target deposit
        token: DepositToken,
        /// Requested action
        action: DepositAction,
    },
}

impl AdminCommand {
    /// Parse a callback data string; `None` for anything unrecognized
    pub fn parse_callback(data: &str) -> Option<Self> {
        match data {
            "admin_orders" => return Some(AdminCommand::ListOrders),
            "admin_deposits" => return Some(AdminCommand::ListDeposits),
            _ => {}
        }

        if let Some(token) = data.strip_prefix("screenshot_order_") {
            return Some(AdminCommand::FetchOrder(OrderToken::new(token)));
        }
        if let Some(token) = data.strip_prefix("screenshot_deposit_") {
            return Some(AdminCommand::FetchDeposit(DepositToken::new(token)));
        }

        if let Some(rest) = data.strip_prefix("order_") {
            let (action, token) = rest.split_once('_')?;
            return Some(AdminCommand::OrderAction {
                token: OrderToken::new(token),
                action: OrderAction::parse(action)?,
            });
        }
        if let Some(rest) = data.strip_prefix("deposit_") {
            let (action, token) = rest.split_once('_')?;
            return Some(AdminCommand::DepositAction {
                token: DepositToken::new(token),
                action: DepositAction::parse(action)?,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_buttons() {
        assert_eq!(
            AdminCommand::parse_callback("admin_orders"),
            Some(AdminCommand::ListOrders)
        );
        assert_eq!(
            AdminCommand::parse_callback("admin_deposits"),
            Some(AdminCommand::ListDeposits)
        );
    }

    #[test]
    fn test_parse_order_actions() {
        assert_eq!(
            AdminCommand::parse_callback("order_success_ORD12345678"),
            Some(AdminCommand::OrderAction {
                token: OrderToken::new("ORD12345678"),
                action: OrderAction::Success,
            })
        );
        assert_eq!(
            AdminCommand::parse_callback("order_processing_ORD12345678"),
            Some(AdminCommand::OrderAction {
                token: OrderToken::new("ORD12345678"),
                action: OrderAction::Processing,
            })
        );
        assert_eq!(
            AdminCommand::parse_callback("order_cancel_ORD12345678"),
            Some(AdminCommand::OrderAction {
                token: OrderToken::new("ORD12345678"),
                action: OrderAction::Cancel,
            })
        );
    }

    #[test]
    fn test_parse_deposit_actions() {
        assert_eq!(
            AdminCommand::parse_callback("deposit_approve_DEP12345678"),
            Some(AdminCommand::DepositAction {
                token: DepositToken::new("DEP12345678"),
                action: DepositAction::Approve,
            })
        );
        assert_eq!(
            AdminCommand::parse_callback("deposit_reject_DEP12345678"),
            Some(AdminCommand::DepositAction {
                token: DepositToken::new("DEP12345678"),
                action: DepositAction::Reject,
            })
        );
    }

    #[test]
    fn test_parse_screenshot_buttons() {
        assert_eq!(
            AdminCommand::parse_callback("screenshot_order_ORD12345678"),
            Some(AdminCommand::FetchOrder(OrderToken::new("ORD12345678")))
        );
        assert_eq!(
            AdminCommand::parse_callback("screenshot_deposit_DEP12345678"),
            Some(AdminCommand::FetchDeposit(DepositToken::new("DEP12345678")))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(AdminCommand::parse_callback(""), None);
        assert_eq!(AdminCommand::parse_callback("order_refund_ORD1"), None);
        assert_eq!(AdminCommand::parse_callback("order_success"), None);
        assert_eq!(AdminCommand::parse_callback("something_else"), None);
    }
}
