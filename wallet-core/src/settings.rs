//! Runtime settings from the external key-value collaborator
//!
//! The settings store is owned elsewhere (the operator edits it out of
//! band); this core only reads it. Components never share a mutable
//! settings object: they take a typed [`SettingsSnapshot`], and a
//! [`CachedSettings`] wrapper re-reads the collaborator on demand.

use crate::types::UserId;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read-only key-value settings collaborator
pub trait SettingsSource: Send + Sync {
    /// Fetch a raw value
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory settings source, used in tests and single-binary setups
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, String>,
}

impl StaticSettings {
    /// Create empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl From<HashMap<String, String>> for StaticSettings {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl SettingsSource for StaticSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Typed view over the flat settings keys, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    /// Reward credited to a referrer on the referred user's first order
    pub referral_reward: Decimal,

    /// Owner operator id
    pub owner_id: Option<UserId>,

    /// Order-admin operator id
    pub order_admin_id: Option<UserId>,

    /// Support-admin operator id
    pub support_admin_id: Option<UserId>,

    /// Stars purchases enabled
    pub allow_stars_payment: bool,

    /// Premium purchases enabled
    pub allow_premium_purchase: bool,

    /// USDT deposit address
    pub usdt_address: Option<String>,

    /// BNB deposit address
    pub bnb_address: Option<String>,

    /// Binance Pay recipient name
    pub binance_pay_name: Option<String>,

    /// Binance Pay recipient id
    pub binance_pay_id: Option<String>,

    /// Official announcement channel link
    pub official_channel: Option<String>,

    /// Secondary channel link
    pub telegram_channel: Option<String>,

    /// Community group link
    pub telegram_group: Option<String>,

    /// Video channel link
    pub youtube_channel: Option<String>,

    /// Customer support link
    pub customer_support_link: Option<String>,

    /// Support contact handle
    pub support_username: Option<String>,
}

impl SettingsSnapshot {
    /// Default referral reward when the key is absent or malformed
    pub const DEFAULT_REFERRAL_REWARD: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

    /// Read every key from the source, falling back to defaults
    pub fn load(source: &dyn SettingsSource) -> Self {
        Self {
            referral_reward: source
                .get("referral_reward")
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_REFERRAL_REWARD),
            owner_id: parse_user_id(source.get("owner_id")),
            order_admin_id: parse_user_id(source.get("order_admin_id")),
            support_admin_id: parse_user_id(source.get("support_admin_id")),
            allow_stars_payment: parse_flag(source.get("allow_stars_payment"), true),
            allow_premium_purchase: parse_flag(source.get("allow_premium_purchase"), true),
            usdt_address: non_empty(source.get("usdt_address")),
            bnb_address: non_empty(source.get("bnb_address")),
            binance_pay_name: non_empty(source.get("binance_pay_name")),
            binance_pay_id: non_empty(source.get("binance_pay_id")),
            official_channel: non_empty(source.get("official_channel")),
            telegram_channel: non_empty(source.get("telegram_channel")),
            telegram_group: non_empty(source.get("telegram_group")),
            youtube_channel: non_empty(source.get("youtube_channel")),
            customer_support_link: non_empty(source.get("customer_support_link")),
            support_username: non_empty(source.get("support_username")),
        }
    }
}

fn parse_user_id(value: Option<String>) -> Option<UserId> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<i64>().ok())
        .map(UserId::new)
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Settings source plus a cached snapshot, reloadable on demand
pub struct CachedSettings {
    source: Arc<dyn SettingsSource>,
    snapshot: RwLock<SettingsSnapshot>,
}

impl CachedSettings {
    /// Build from a source, taking the initial snapshot immediately
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        let snapshot = SettingsSnapshot::load(source.as_ref());
        Self {
            source,
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.snapshot.read().clone()
    }

    /// Re-read every key from the source
    pub fn reload(&self) {
        let fresh = SettingsSnapshot::load(self.source.as_ref());
        *self.snapshot.write() = fresh;
    }
}

impl fmt::Debug for CachedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSettings")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}
