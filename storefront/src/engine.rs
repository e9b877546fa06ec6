//! Main storefront engine
//!
//! Resolves catalog packages, applies the purchase and deposit intake
//! rules, forwards validated drafts to the wallet ledger, and fires the
//! admin notifications. The engine never mutates balances itself; every
//! mutation funnels through the wallet's transition contracts.

use crate::{
    catalog::Catalog,
    config::Config,
    notify::{Dispatcher, NotificationSink},
    types::{DepositRequest, OrderRequest, PaymentChoice},
    Error, Result,
};
use std::sync::Arc;
use wallet_core::{
    Deposit, DepositDraft, DepositMethod, Order, OrderDraft, Payment, User, UserId, Wallet,
};

/// Storefront engine
pub struct StorefrontEngine {
    /// Wallet ledger
    wallet: Arc<Wallet>,

    /// Catalog collaborator
    catalog: Arc<dyn Catalog>,

    /// Notification dispatcher
    dispatcher: Dispatcher,
}

impl StorefrontEngine {
    /// Create new engine
    pub fn new(
        wallet: Arc<Wallet>,
        catalog: Arc<dyn Catalog>,
        sink: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        Self {
            wallet,
            catalog,
            dispatcher: Dispatcher::new(sink, config.notifications),
        }
    }

    /// Active packages for the storefront page
    pub fn packages(&self) -> Vec<crate::catalog::Package> {
        self.catalog.active_packages()
    }

    /// Place an order
    ///
    /// Resolves the package, gates the chosen payment method on the
    /// package flags and the settings toggles, and submits the draft to
    /// the ledger. The admin notification is fire-and-forget: its failure
    /// neither blocks nor rolls back the order.
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order> {
        let package = self
            .catalog
            .package(request.package_id)
            .ok_or(Error::UnknownPackage(request.package_id))?;

        let snapshot = self.wallet.settings().snapshot();
        let payment = match request.method {
            PaymentChoice::Balance => Payment::Balance {
                amount: package.price,
            },
            PaymentChoice::Stars => {
                if !snapshot.allow_stars_payment {
                    return Err(Error::MethodUnavailable(
                        "stars payments are disabled".to_string(),
                    ));
                }
                if !package.allow_stars || package.stars_price <= 0 {
                    return Err(Error::MethodUnavailable(format!(
                        "package {} cannot be bought with stars",
                        package.id
                    )));
                }
                Payment::Stars {
                    amount: package.stars_price,
                }
            }
            PaymentChoice::Premium => {
                if !snapshot.allow_premium_purchase {
                    return Err(Error::MethodUnavailable(
                        "premium purchases are disabled".to_string(),
                    ));
                }
                if !package.require_premium {
                    return Err(Error::MethodUnavailable(format!(
                        "package {} is not a premium package",
                        package.id
                    )));
                }
                Payment::Premium
            }
        };

        let draft = OrderDraft {
            user_id: request.user_id,
            package_id: package.id,
            package_name: package.name.clone(),
            payment,
            user_input: request.user_input.trim().to_string(),
            proof: request.proof,
        };

        let order = self.wallet.place_order(draft).await?;
        self.notify_order(&order);
        Ok(order)
    }

    /// Submit a deposit claim
    pub async fn submit_deposit(&self, request: DepositRequest) -> Result<Deposit> {
        let draft = DepositDraft {
            user_id: request.user_id,
            amount: request.amount,
            method: request.method,
            reference: request.reference,
            proof: request.proof,
        };

        let deposit = self.wallet.submit_deposit(draft).await?;
        self.notify_deposit(&deposit);
        Ok(deposit)
    }

    /// Move earned referral rewards into the spendable balance
    pub async fn transfer_referral(
        &self,
        user_id: UserId,
        amount: rust_decimal::Decimal,
    ) -> Result<User> {
        Ok(self.wallet.transfer_referral(user_id, amount).await?)
    }

    /// Payment instructions for a deposit method, from the settings
    /// snapshot; `None` when the operator has not configured the method
    pub fn deposit_instructions(&self, method: DepositMethod) -> Option<String> {
        let snapshot = self.wallet.settings().snapshot();
        match method {
            DepositMethod::Usdt => snapshot
                .usdt_address
                .map(|address| format!("Send USDT to {address}")),
            DepositMethod::Bnb => snapshot
                .bnb_address
                .map(|address| format!("Send BNB to {address}")),
            DepositMethod::BinancePay => match (snapshot.binance_pay_name, snapshot.binance_pay_id)
            {
                (Some(name), Some(id)) => Some(format!("Binance Pay to {name} (ID {id})")),
                _ => None,
            },
        }
    }

    fn notify_order(&self, order: &Order) {
        match self.wallet.user(order.user_id) {
            Ok(Some(user)) => self.dispatcher.dispatch_order(order, &user),
            Ok(None) => {
                tracing::warn!(order = %order.token, "Buyer vanished before notification")
            }
            Err(e) => {
                tracing::warn!(order = %order.token, "Skipping notification: {}", e)
            }
        }
    }

    fn notify_deposit(&self, deposit: &Deposit) {
        match self.wallet.user(deposit.user_id) {
            Ok(Some(user)) => self.dispatcher.dispatch_deposit(deposit, &user),
            Ok(None) => {
                tracing::warn!(deposit = %deposit.token, "Claimant vanished before notification")
            }
            Err(e) => {
                tracing::warn!(deposit = %deposit.token, "Skipping notification: {}", e)
            }
        }
    }
}

impl std::fmt::Debug for StorefrontEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{JsonCatalog, Package};
    use crate::notify::NotifyError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;
    use std::time::Duration;
    use wallet_core::{
        CachedSettings, Config as WalletConfig, DepositAction, StaticSettings, Transition,
    };

    #[derive(Default)]
    struct RecordingSink {
        orders: Mutex<Vec<String>>,
        deposits: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify_new_order(
            &self,
            order: &Order,
            _user: &User,
        ) -> std::result::Result<(), NotifyError> {
            self.orders
                .lock()
                .unwrap()
                .push(order.token.as_str().to_string());
            Ok(())
        }

        async fn notify_new_deposit(
            &self,
            deposit: &Deposit,
            _user: &User,
        ) -> std::result::Result<(), NotifyError> {
            self.deposits
                .lock()
                .unwrap()
                .push(deposit.token.as_str().to_string());
            Ok(())
        }
    }

    fn test_packages() -> Vec<Package> {
        vec![
            Package {
                id: 1,
                name: "1000 Stars".to_string(),
                price: Decimal::new(3000, 2),
                stars_price: 1200,
                input_label: "Username".to_string(),
                description: String::new(),
                allow_stars: true,
                require_premium: false,
                active: true,
            },
            Package {
                id: 2,
                name: "Members Pack".to_string(),
                price: Decimal::ZERO,
                stars_price: 0,
                input_label: "Username".to_string(),
                description: String::new(),
                allow_stars: false,
                require_premium: true,
                active: true,
            },
        ]
    }

    async fn create_test_engine(
        settings: StaticSettings,
    ) -> (StorefrontEngine, Arc<RecordingSink>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = WalletConfig::default();
        config.data_dir = temp_dir.path().to_path_buf();

        let cached = Arc::new(CachedSettings::new(Arc::new(settings)));
        let wallet = Arc::new(Wallet::open(config, cached).await.unwrap());
        let sink = Arc::new(RecordingSink::default());
        let engine = StorefrontEngine::new(
            wallet,
            Arc::new(JsonCatalog::from_packages(test_packages())),
            sink.clone(),
            Config::default(),
        );
        (engine, sink, temp_dir)
    }

    async fn funded_buyer(engine: &StorefrontEngine, id: i64, cents: i64) -> UserId {
        let user = engine
            .wallet
            .register_user(UserId::new(id), "buyer", "Buyer", None)
            .await
            .unwrap();
        if cents > 0 {
            let deposit = engine
                .submit_deposit(DepositRequest {
                    user_id: user.user_id,
                    amount: Decimal::new(cents, 2),
                    method: DepositMethod::Usdt,
                    reference: "0xfund".to_string(),
                    proof: None,
                })
                .await
                .unwrap();
            let outcome = engine
                .wallet
                .transition_deposit(deposit.token, DepositAction::Approve)
                .await
                .unwrap();
            assert!(matches!(outcome, Transition::Applied(_)));
        }
        user.user_id
    }

    fn order_request(user_id: UserId, package_id: i64, method: PaymentChoice) -> OrderRequest {
        OrderRequest {
            user_id,
            package_id,
            method,
            user_input: "@buyer".to_string(),
            proof: Some("uploads/proof.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_balance_purchase_end_to_end() {
        let (engine, sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        let order = engine
            .place_order(order_request(buyer, 1, PaymentChoice::Balance))
            .await
            .unwrap();
        assert_eq!(order.package_name, "1000 Stars");
        assert_eq!(
            order.payment,
            Payment::Balance {
                amount: Decimal::new(3000, 2)
            }
        );

        let user = engine.wallet.user(buyer).unwrap().unwrap();
        assert_eq!(user.main, Decimal::new(2000, 2));
        assert_eq!(user.hold, Decimal::new(3000, 2));

        // The notification goes out asynchronously
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            sink.orders.lock().unwrap().as_slice(),
            &[order.token.as_str().to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_package_rejected() {
        let (engine, _sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        let result = engine
            .place_order(order_request(buyer, 99, PaymentChoice::Balance))
            .await;
        assert!(matches!(result, Err(Error::UnknownPackage(99))));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let (engine, sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        let mut request = order_request(buyer, 1, PaymentChoice::Balance);
        request.user_input = "   ".to_string();
        let result = engine.place_order(request).await;
        assert!(matches!(result, Err(Error::Wallet(_))));

        // Rejected orders never notify
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sink.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_proof_rejected() {
        let (engine, _sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        let mut request = order_request(buyer, 1, PaymentChoice::Balance);
        request.proof = None;
        assert!(engine.place_order(request).await.is_err());
    }

    #[tokio::test]
    async fn test_stars_purchase_gated_by_toggle() {
        let settings = StaticSettings::new().with("allow_stars_payment", "false");
        let (engine, _sink, _temp) = create_test_engine(settings).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        let result = engine
            .place_order(order_request(buyer, 1, PaymentChoice::Stars))
            .await;
        assert!(matches!(result, Err(Error::MethodUnavailable(_))));
    }

    #[tokio::test]
    async fn test_stars_purchase_requires_package_support() {
        let (engine, _sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 5000).await;

        // Package 2 does not offer stars checkout
        let result = engine
            .place_order(order_request(buyer, 2, PaymentChoice::Stars))
            .await;
        assert!(matches!(result, Err(Error::MethodUnavailable(_))));
    }

    #[tokio::test]
    async fn test_premium_purchase_paths() {
        let (engine, _sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let buyer = funded_buyer(&engine, 1, 0).await;

        // Premium checkout only applies to premium packages
        let result = engine
            .place_order(order_request(buyer, 1, PaymentChoice::Premium))
            .await;
        assert!(matches!(result, Err(Error::MethodUnavailable(_))));

        // And the buyer needs the entitlement
        let result = engine
            .place_order(order_request(buyer, 2, PaymentChoice::Premium))
            .await;
        assert!(matches!(
            result,
            Err(Error::Wallet(wallet_core::Error::PremiumRequired(_)))
        ));
    }

    #[tokio::test]
    async fn test_deposit_validation_rules() {
        let (engine, sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let user = engine
            .wallet
            .register_user(UserId::new(1), "u", "U", None)
            .await
            .unwrap();

        // Below the per-method minimum
        let result = engine
            .submit_deposit(DepositRequest {
                user_id: user.user_id,
                amount: Decimal::new(500, 2),
                method: DepositMethod::Usdt,
                reference: "0xabc".to_string(),
                proof: None,
            })
            .await;
        assert!(result.is_err());

        // Binance Pay references must be numeric
        let result = engine
            .submit_deposit(DepositRequest {
                user_id: user.user_id,
                amount: Decimal::new(500, 2),
                method: DepositMethod::BinancePay,
                reference: "0xabc".to_string(),
                proof: None,
            })
            .await;
        assert!(result.is_err());

        // A valid claim lands in Processing and notifies
        let deposit = engine
            .submit_deposit(DepositRequest {
                user_id: user.user_id,
                amount: Decimal::new(500, 2),
                method: DepositMethod::BinancePay,
                reference: "424242424242".to_string(),
                proof: None,
            })
            .await
            .unwrap();
        assert_eq!(deposit.status, wallet_core::DepositStatus::Processing);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            sink.deposits.lock().unwrap().as_slice(),
            &[deposit.token.as_str().to_string()]
        );
    }

    #[tokio::test]
    async fn test_deposit_instructions_from_settings() {
        let settings = StaticSettings::new()
            .with("usdt_address", "TAbc123")
            .with("binance_pay_name", "StarShop")
            .with("binance_pay_id", "9876");
        let (engine, _sink, _temp) = create_test_engine(settings).await;

        assert_eq!(
            engine.deposit_instructions(DepositMethod::Usdt).as_deref(),
            Some("Send USDT to TAbc123")
        );
        assert_eq!(
            engine
                .deposit_instructions(DepositMethod::BinancePay)
                .as_deref(),
            Some("Binance Pay to StarShop (ID 9876)")
        );
        assert_eq!(engine.deposit_instructions(DepositMethod::Bnb), None);
    }

    #[tokio::test]
    async fn test_packages_lists_active_only() {
        let (engine, _sink, _temp) = create_test_engine(StaticSettings::new()).await;
        let packages = engine.packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].id, 1);
    }
}
