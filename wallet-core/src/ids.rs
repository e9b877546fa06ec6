//! Token generation for orders, deposits, and referral codes
//!
//! Order and deposit tokens are a type prefix plus the last 8 digits of a
//! millisecond timestamp, kept strictly increasing per process so two
//! records created in the same millisecond still get distinct suffixes.
//! The single-writer actor checks storage before committing a token, so a
//! suffix that wrapped around to a historical value is regenerated rather
//! than colliding.

use crate::types::{DepositToken, OrderToken};
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_MOD: u64 = 100_000_000;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

/// Monotonic token generator
#[derive(Debug, Default)]
pub struct TokenGenerator {
    last: AtomicU64,
}

impl TokenGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Next strictly-increasing timestamp-derived value
    fn next_raw(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        loop {
            let prev = self.last.load(Ordering::Acquire);
            let candidate = now.max(prev + 1);
            if self
                .last
                .compare_exchange(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return candidate;
            }
        }
    }

    /// Next order token
    pub fn order_token(&self) -> OrderToken {
        OrderToken::new(format!("ORD{:08}", self.next_raw() % SUFFIX_MOD))
    }

    /// Next deposit token
    pub fn deposit_token(&self) -> DepositToken {
        DepositToken::new(format!("DEP{:08}", self.next_raw() % SUFFIX_MOD))
    }
}

/// Random referral code ("REF" + 6 uppercase alphanumerics)
pub fn referral_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("REF{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_token_shape() {
        let gen = TokenGenerator::new();
        let token = gen.order_token();
        assert!(token.as_str().starts_with("ORD"));
        assert_eq!(token.as_str().len(), 11);
        assert!(token.as_str()[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_tokens_unique_within_process() {
        let gen = TokenGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(gen.order_token()));
        }
    }

    #[test]
    fn test_deposit_token_prefix() {
        let gen = TokenGenerator::new();
        assert!(gen.deposit_token().as_str().starts_with("DEP"));
    }

    #[test]
    fn test_referral_code_shape() {
        let code = referral_code();
        assert!(code.starts_with("REF"));
        assert_eq!(code.len(), 9);
        assert!(code[3..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
