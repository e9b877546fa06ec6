//! Referral attribution and rewards
//!
//! Attribution happens once, at signup: the supplied code is resolved to
//! its owner and a link record is created. The reward fires at most once,
//! when the referred user's first order reaches `Success`. Two flags make
//! the reward idempotent under retried transitions: the link's `rewarded`
//! flag and the user's `first_order_completed` flag.

use crate::{
    storage::Storage,
    types::{Referral, ReferralOverview, User, UserId},
    Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Resolve a signup code to a referrer, ignoring self-referral and
/// unknown codes
pub fn resolve_referrer(
    storage: &Storage,
    code: Option<&str>,
    new_user: UserId,
) -> Result<Option<UserId>> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    Ok(storage
        .user_by_referral_code(code)?
        .filter(|referrer| *referrer != new_user))
}

/// Build the link record created at signup
pub fn new_link(referrer_id: UserId, referred_id: UserId, now: DateTime<Utc>) -> Referral {
    Referral {
        id: Uuid::new_v4(),
        referrer_id,
        referred_id,
        reward_amount: Decimal::ZERO,
        rewarded: false,
        created_at: now,
    }
}

/// Apply the one-time reward to the referrer and mark the link paid
///
/// Callers must have checked `link.rewarded` first; this only performs
/// the mutation.
pub fn apply_reward(referrer: &mut User, link: &mut Referral, amount: Decimal) {
    referrer.referral += amount;
    link.rewarded = true;
    link.reward_amount = amount;
}

/// Referral summary for one user, if the user exists
pub fn overview(storage: &Storage, user_id: UserId) -> Result<Option<ReferralOverview>> {
    let Some(user) = storage.user(user_id)? else {
        return Ok(None);
    };
    let links = storage.referrals_of(user_id)?;
    let successful = links.iter().filter(|l| l.rewarded).count() as u64;
    Ok(Some(ReferralOverview {
        referral_code: user.referral_code,
        referral_balance: user.referral,
        total_referrals: links.len() as u64,
        successful_referrals: successful,
    }))
}
