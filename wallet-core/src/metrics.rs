//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `wallet_users_registered_total` - Users created
//! - `wallet_orders_placed_total` - Orders accepted into `Pending`
//! - `wallet_orders_completed_total` - Orders transitioned to `Success`
//! - `wallet_orders_cancelled_total` - Orders transitioned to `Cancel`
//! - `wallet_deposits_submitted_total` - Deposits accepted into `Processing`
//! - `wallet_deposits_approved_total` - Deposits approved and credited
//! - `wallet_referral_rewards_total` - Referral rewards paid
//! - `wallet_command_duration_seconds` - Histogram of actor command latencies

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Users created
    pub users_registered: IntCounter,

    /// Orders accepted
    pub orders_placed: IntCounter,

    /// Orders fulfilled
    pub orders_completed: IntCounter,

    /// Orders cancelled
    pub orders_cancelled: IntCounter,

    /// Deposits accepted
    pub deposits_submitted: IntCounter,

    /// Deposits approved
    pub deposits_approved: IntCounter,

    /// Referral rewards paid
    pub referral_rewards: IntCounter,

    /// Actor command latency histogram
    pub command_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let users_registered =
            IntCounter::new("wallet_users_registered_total", "Users created")?;
        registry.register(Box::new(users_registered.clone()))?;

        let orders_placed =
            IntCounter::new("wallet_orders_placed_total", "Orders accepted into Pending")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let orders_completed = IntCounter::new(
            "wallet_orders_completed_total",
            "Orders transitioned to Success",
        )?;
        registry.register(Box::new(orders_completed.clone()))?;

        let orders_cancelled = IntCounter::new(
            "wallet_orders_cancelled_total",
            "Orders transitioned to Cancel",
        )?;
        registry.register(Box::new(orders_cancelled.clone()))?;

        let deposits_submitted = IntCounter::new(
            "wallet_deposits_submitted_total",
            "Deposits accepted into Processing",
        )?;
        registry.register(Box::new(deposits_submitted.clone()))?;

        let deposits_approved = IntCounter::new(
            "wallet_deposits_approved_total",
            "Deposits approved and credited",
        )?;
        registry.register(Box::new(deposits_approved.clone()))?;

        let referral_rewards =
            IntCounter::new("wallet_referral_rewards_total", "Referral rewards paid")?;
        registry.register(Box::new(referral_rewards.clone()))?;

        let command_duration = Histogram::with_opts(
            HistogramOpts::new(
                "wallet_command_duration_seconds",
                "Histogram of actor command latencies",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500]),
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        Ok(Self {
            users_registered,
            orders_placed,
            orders_completed,
            orders_cancelled,
            deposits_submitted,
            deposits_approved,
            referral_rewards,
            command_duration,
            registry,
        })
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.orders_placed.get(), 0);
        assert_eq!(metrics.deposits_approved.get(), 0);
    }

    #[test]
    fn test_counters_increment() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_placed.inc();
        metrics.orders_placed.inc();
        assert_eq!(metrics.orders_placed.get(), 2);

        metrics.referral_rewards.inc();
        assert_eq!(metrics.referral_rewards.get(), 1);
    }

    #[test]
    fn test_independent_registries() {
        // Two collectors must not clash, each carries its own registry
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.orders_placed.inc();
        assert_eq!(b.orders_placed.get(), 0);
    }
}
