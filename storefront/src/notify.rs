//! Admin notification dispatch
//!
//! Notifications are a best-effort side channel: the ledger write is the
//! source of truth and has already committed by the time a notification
//! goes out. Delivery retries with exponential backoff up to a configured
//! attempt cap; a terminal failure is logged and dropped, never surfaced
//! to the purchase or deposit caller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use wallet_core::{Deposit, Order, User};

/// Error type produced by notification sinks
pub type NotifyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transport that delivers admin notifications (the bot, in production)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Announce a new order to the operators
    async fn notify_new_order(&self, order: &Order, user: &User)
        -> std::result::Result<(), NotifyError>;

    /// Announce a new deposit to the operators
    async fn notify_new_deposit(
        &self,
        deposit: &Deposit,
        user: &User,
    ) -> std::result::Result<(), NotifyError>;
}

/// Dispatch configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Max delivery attempts
    pub max_attempts: u32,

    /// Initial retry delay
    pub initial_retry_delay: Duration,

    /// Max retry delay
    pub max_retry_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_retry_delay: Duration::from_millis(100),
            max_retry_delay: Duration::from_secs(2),
        }
    }
}

enum Event {
    Order(Order, User),
    Deposit(Deposit, User),
}

impl Event {
    fn describe(&self) -> String {
        match self {
            Event::Order(order, _) => format!("order {}", order.token),
            Event::Deposit(deposit, _) => format!("deposit {}", deposit.token),
        }
    }
}

/// Fire-and-forget notification dispatcher
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn NotificationSink>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create new dispatcher
    pub fn new(sink: Arc<dyn NotificationSink>, config: DispatchConfig) -> Self {
        Self { sink, config }
    }

    /// Announce a new order without blocking the caller
    pub fn dispatch_order(&self, order: &Order, user: &User) {
        self.spawn(Event::Order(order.clone(), user.clone()));
    }

    /// Announce a new deposit without blocking the caller
    pub fn dispatch_deposit(&self, deposit: &Deposit, user: &User) {
        self.spawn(Event::Deposit(deposit.clone(), user.clone()));
    }

    fn spawn(&self, event: Event) {
        let sink = self.sink.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            deliver(sink, config, event).await;
        });
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Deliver with exponential backoff retry
async fn deliver(sink: Arc<dyn NotificationSink>, config: DispatchConfig, event: Event) {
    let mut attempts = 0;
    let mut delay = config.initial_retry_delay;

    loop {
        attempts += 1;

        let result = match &event {
            Event::Order(order, user) => sink.notify_new_order(order, user).await,
            Event::Deposit(deposit, user) => sink.notify_new_deposit(deposit, user).await,
        };

        match result {
            Ok(()) => {
                if attempts > 1 {
                    info!(
                        "Notification for {} delivered after {} attempts",
                        event.describe(),
                        attempts
                    );
                }
                return;
            }
            Err(e) => {
                if attempts >= config.max_attempts {
                    error!(
                        "Dropping notification for {} after {} attempts: {}",
                        event.describe(),
                        attempts,
                        e
                    );
                    return;
                }

                warn!(
                    "Notification for {} failed (attempt {}), retrying in {:?}: {}",
                    event.describe(),
                    attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_retry_delay);
            }
        }
    }
}
