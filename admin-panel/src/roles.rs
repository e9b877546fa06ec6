//! Operator roles and the allow-list
//!
//! Authorization is a flat allow-list from the settings snapshot. Three
//! roles: the owner and the order admin can transition records, the
//! support admin can only view. Everyone else is silently ignored; the
//! panel never reveals whether an id was unknown or unauthorized.

use wallet_core::{SettingsSnapshot, UserId};

/// Operator role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full access
    Owner,
    /// Can view and transition orders and deposits
    OrderAdmin,
    /// Can view records and user history only
    SupportAdmin,
}

impl Role {
    /// Whether this role may transition orders and deposits
    pub fn can_transition(&self) -> bool {
        matches!(self, Role::Owner | Role::OrderAdmin)
    }
}

/// Allow-list resolved from the settings snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDirectory {
    owner: Option<UserId>,
    order_admin: Option<UserId>,
    support_admin: Option<UserId>,
}

impl AdminDirectory {
    /// Build from the settings snapshot
    pub fn from_snapshot(snapshot: &SettingsSnapshot) -> Self {
        Self {
            owner: snapshot.owner_id,
            order_admin: snapshot.order_admin_id,
            support_admin: snapshot.support_admin_id,
        }
    }

    /// Resolve a caller to a role, owner first
    pub fn role_of(&self, caller: UserId) -> Option<Role> {
        if self.owner == Some(caller) {
            Some(Role::Owner)
        } else if self.order_admin == Some(caller) {
            Some(Role::OrderAdmin)
        } else if self.support_admin == Some(caller) {
            Some(Role::SupportAdmin)
        } else {
            None
        }
    }
}
