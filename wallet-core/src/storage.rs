//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `users` - User records (key: user_id, big-endian)
//! - `orders` - Order records (key: order token)
//! - `deposits` - Deposit records (key: deposit token)
//! - `referrals` - Referral links (key: referred user_id)
//! - `indices` - Secondary indices for recency, per-user history,
//!   status counting, and referral-code lookup
//!
//! Every multi-record mutation (order placement, status transition with
//! balance effects, signup with a referral link) commits through a single
//! `WriteBatch`, so a crash never leaves a balance move without its
//! record or vice versa.

use crate::{
    config::Config,
    error::{Error, Result},
    types::{
        Deposit, DepositStatus, DepositToken, Order, OrderStatus, OrderToken, Referral, User,
        UserId, WalletStats,
    },
};
use chrono::{DateTime, Utc};
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DBCompactionStyle, Direction, IteratorMode, Options,
    WriteBatch, DB,
};
use std::sync::Arc;

/// Column family names
const CF_USERS: &str = "users";
const CF_ORDERS: &str = "orders";
const CF_DEPOSITS: &str = "deposits";
const CF_REFERRALS: &str = "referrals";
const CF_INDICES: &str = "indices";

/// Index key namespaces within `indices`
const IDX_ORDER_RECENCY: &[u8] = b"or:";
const IDX_DEPOSIT_RECENCY: &[u8] = b"dr:";
const IDX_USER_ORDERS: &[u8] = b"uo:";
const IDX_USER_DEPOSITS: &[u8] = b"ud:";
const IDX_ORDER_STATUS: &[u8] = b"os:";
const IDX_DEPOSIT_STATUS: &[u8] = b"ds:";
const IDX_REFERRAL_CODE: &[u8] = b"rc:";
const IDX_REFERRER_LINKS: &[u8] = b"rl:";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,
}

impl Storage {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);
        db_opts.set_compaction_style(DBCompactionStyle::Universal);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_USERS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_ORDERS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_DEPOSITS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_REFERRALS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_INDICES, Self::cf_options_indices()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened RocksDB at {:?}", path);

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_options_records() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_indices() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    // User operations

    /// Get user by id
    pub fn user(&self, user_id: UserId) -> Result<Option<User>> {
        let cf = self.cf_handle(CF_USERS)?;
        match self.db.get_cf(cf, user_id.key_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Resolve a referral code to its owner
    pub fn user_by_referral_code(&self, code: &str) -> Result<Option<UserId>> {
        let cf = self.cf_handle(CF_INDICES)?;
        let key = concat_key(&[IDX_REFERRAL_CODE, code.as_bytes()]);
        match self.db.get_cf(cf, key)? {
            Some(value) if value.len() == 8 => {
                let raw: [u8; 8] = value.as_slice().try_into().map_err(|_| {
                    Error::Storage("Malformed referral code index entry".to_string())
                })?;
                Ok(Some(UserId::new(i64::from_be_bytes(raw))))
            }
            Some(_) => Err(Error::Storage(
                "Malformed referral code index entry".to_string(),
            )),
            None => Ok(None),
        }
    }

    /// Create user, with the referral link (if any) in the same batch
    pub fn create_user(&self, user: &User, referral: Option<&Referral>) -> Result<()> {
        let cf_users = self.cf_handle(CF_USERS)?;
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(cf_users, user.user_id.key_bytes(), bincode::serialize(user)?);
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_REFERRAL_CODE, user.referral_code.as_bytes()]),
            user.user_id.key_bytes(),
        );

        if let Some(link) = referral {
            let cf_referrals = self.cf_handle(CF_REFERRALS)?;
            batch.put_cf(
                cf_referrals,
                link.referred_id.key_bytes(),
                bincode::serialize(link)?,
            );
            batch.put_cf(
                cf_indices,
                concat_key(&[
                    IDX_REFERRER_LINKS,
                    &link.referrer_id.key_bytes(),
                    &link.referred_id.key_bytes(),
                ]),
                b"",
            );
        }

        self.db.write(batch)?;
        Ok(())
    }

    /// Put user (single-record balance update)
    pub fn put_user(&self, user: &User) -> Result<()> {
        let cf = self.cf_handle(CF_USERS)?;
        self.db
            .put_cf(cf, user.user_id.key_bytes(), bincode::serialize(user)?)?;
        Ok(())
    }

    // Order operations

    /// Get order by token
    pub fn order(&self, token: &OrderToken) -> Result<Option<Order>> {
        let cf = self.cf_handle(CF_ORDERS)?;
        match self.db.get_cf(cf, token.as_str().as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Create order together with the buyer's balance move (atomic)
    pub fn create_order(&self, order: &Order, user: &User) -> Result<()> {
        let cf_orders = self.cf_handle(CF_ORDERS)?;
        let cf_users = self.cf_handle(CF_USERS)?;
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_orders,
            order.token.as_str().as_bytes(),
            bincode::serialize(order)?,
        );
        batch.put_cf(cf_users, user.user_id.key_bytes(), bincode::serialize(user)?);

        let token = order.token.as_str().as_bytes();
        let stamp = inverted_stamp(&order.created_at);
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_ORDER_RECENCY, &stamp, token]),
            token,
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_USER_ORDERS, &order.user_id.key_bytes(), &stamp, token]),
            token,
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_ORDER_STATUS, &[order.status as u8], token]),
            b"",
        );

        self.db.write(batch)?;

        tracing::debug!(order = %order.token, user = %order.user_id, "Order created");
        Ok(())
    }

    /// Commit an order status transition and its balance effects (atomic)
    ///
    /// `touched_users` carries the buyer and, on a rewarded first order,
    /// the referrer. `referral` carries the rewarded link update.
    pub fn commit_order_transition(
        &self,
        order: &Order,
        previous_status: OrderStatus,
        touched_users: &[&User],
        referral: Option<&Referral>,
    ) -> Result<()> {
        let cf_orders = self.cf_handle(CF_ORDERS)?;
        let cf_users = self.cf_handle(CF_USERS)?;
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_orders,
            order.token.as_str().as_bytes(),
            bincode::serialize(order)?,
        );

        let token = order.token.as_str().as_bytes();
        batch.delete_cf(
            cf_indices,
            concat_key(&[IDX_ORDER_STATUS, &[previous_status as u8], token]),
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_ORDER_STATUS, &[order.status as u8], token]),
            b"",
        );

        for user in touched_users {
            batch.put_cf(cf_users, user.user_id.key_bytes(), bincode::serialize(*user)?);
        }

        if let Some(link) = referral {
            let cf_referrals = self.cf_handle(CF_REFERRALS)?;
            batch.put_cf(
                cf_referrals,
                link.referred_id.key_bytes(),
                bincode::serialize(link)?,
            );
        }

        self.db.write(batch)?;
        Ok(())
    }

    /// Most recent orders, newest first
    pub fn recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        self.scan_tokens(IDX_ORDER_RECENCY, limit)?
            .into_iter()
            .map(|token| {
                self.order(&OrderToken::new(token.clone()))?
                    .ok_or_else(|| Error::OrderNotFound(token))
            })
            .collect()
    }

    /// One user's most recent orders, newest first
    pub fn user_orders(&self, user_id: UserId, limit: usize) -> Result<Vec<Order>> {
        let prefix = concat_key(&[IDX_USER_ORDERS, &user_id.key_bytes()]);
        self.scan_tokens(&prefix, limit)?
            .into_iter()
            .map(|token| {
                self.order(&OrderToken::new(token.clone()))?
                    .ok_or_else(|| Error::OrderNotFound(token))
            })
            .collect()
    }

    /// Count orders currently in a status
    pub fn count_orders_with_status(&self, status: OrderStatus) -> Result<u64> {
        self.count_prefix(&concat_key(&[IDX_ORDER_STATUS, &[status as u8]]))
    }

    // Deposit operations

    /// Get deposit by token
    pub fn deposit(&self, token: &DepositToken) -> Result<Option<Deposit>> {
        let cf = self.cf_handle(CF_DEPOSITS)?;
        match self.db.get_cf(cf, token.as_str().as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Create deposit record (no balance effect until approval)
    pub fn create_deposit(&self, deposit: &Deposit) -> Result<()> {
        let cf_deposits = self.cf_handle(CF_DEPOSITS)?;
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_deposits,
            deposit.token.as_str().as_bytes(),
            bincode::serialize(deposit)?,
        );

        let token = deposit.token.as_str().as_bytes();
        let stamp = inverted_stamp(&deposit.created_at);
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_DEPOSIT_RECENCY, &stamp, token]),
            token,
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[
                IDX_USER_DEPOSITS,
                &deposit.user_id.key_bytes(),
                &stamp,
                token,
            ]),
            token,
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_DEPOSIT_STATUS, &[deposit.status as u8], token]),
            b"",
        );

        self.db.write(batch)?;

        tracing::debug!(deposit = %deposit.token, user = %deposit.user_id, "Deposit created");
        Ok(())
    }

    /// Commit a deposit status transition and its credit (atomic)
    pub fn commit_deposit_transition(
        &self,
        deposit: &Deposit,
        previous_status: DepositStatus,
        user: Option<&User>,
    ) -> Result<()> {
        let cf_deposits = self.cf_handle(CF_DEPOSITS)?;
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_deposits,
            deposit.token.as_str().as_bytes(),
            bincode::serialize(deposit)?,
        );

        let token = deposit.token.as_str().as_bytes();
        batch.delete_cf(
            cf_indices,
            concat_key(&[IDX_DEPOSIT_STATUS, &[previous_status as u8], token]),
        );
        batch.put_cf(
            cf_indices,
            concat_key(&[IDX_DEPOSIT_STATUS, &[deposit.status as u8], token]),
            b"",
        );

        if let Some(user) = user {
            let cf_users = self.cf_handle(CF_USERS)?;
            batch.put_cf(cf_users, user.user_id.key_bytes(), bincode::serialize(user)?);
        }

        self.db.write(batch)?;
        Ok(())
    }

    /// Most recent deposits, newest first
    pub fn recent_deposits(&self, limit: usize) -> Result<Vec<Deposit>> {
        self.scan_tokens(IDX_DEPOSIT_RECENCY, limit)?
            .into_iter()
            .map(|token| {
                self.deposit(&DepositToken::new(token.clone()))?
                    .ok_or_else(|| Error::DepositNotFound(token))
            })
            .collect()
    }

    /// One user's most recent deposits, newest first
    pub fn user_deposits(&self, user_id: UserId, limit: usize) -> Result<Vec<Deposit>> {
        let prefix = concat_key(&[IDX_USER_DEPOSITS, &user_id.key_bytes()]);
        self.scan_tokens(&prefix, limit)?
            .into_iter()
            .map(|token| {
                self.deposit(&DepositToken::new(token.clone()))?
                    .ok_or_else(|| Error::DepositNotFound(token))
            })
            .collect()
    }

    /// Count deposits currently in a status
    pub fn count_deposits_with_status(&self, status: DepositStatus) -> Result<u64> {
        self.count_prefix(&concat_key(&[IDX_DEPOSIT_STATUS, &[status as u8]]))
    }

    // Referral operations

    /// Get the referral link for a referred user
    pub fn referral_by_referred(&self, referred_id: UserId) -> Result<Option<Referral>> {
        let cf = self.cf_handle(CF_REFERRALS)?;
        match self.db.get_cf(cf, referred_id.key_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// All referral links created by one referrer
    pub fn referrals_of(&self, referrer_id: UserId) -> Result<Vec<Referral>> {
        let cf_indices = self.cf_handle(CF_INDICES)?;
        let prefix = concat_key(&[IDX_REFERRER_LINKS, &referrer_id.key_bytes()]);

        let mut links = Vec::new();
        let iter = self.db.iterator_cf(
            cf_indices,
            IteratorMode::From(&prefix, Direction::Forward),
        );
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let referred_bytes: [u8; 8] = key[prefix.len()..]
                .try_into()
                .map_err(|_| Error::Storage("Malformed referrer index entry".to_string()))?;
            let referred_id = UserId::new(i64::from_be_bytes(referred_bytes));
            if let Some(link) = self.referral_by_referred(referred_id)? {
                links.push(link);
            }
        }
        Ok(links)
    }

    // Statistics

    /// Aggregate counters for the admin dashboard
    pub fn stats(&self) -> Result<WalletStats> {
        Ok(WalletStats {
            total_users: self.count_cf(CF_USERS)?,
            total_orders: self.count_cf(CF_ORDERS)?,
            pending_orders: self.count_orders_with_status(OrderStatus::Pending)?,
            processing_deposits: self.count_deposits_with_status(DepositStatus::Processing)?,
        })
    }

    fn count_cf(&self, name: &str) -> Result<u64> {
        let cf = self.cf_handle(name)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    fn count_prefix(&self, prefix: &[u8]) -> Result<u64> {
        let cf = self.cf_handle(CF_INDICES)?;
        let mut count = 0u64;
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Collect up to `limit` tokens from a recency-ordered index
    fn scan_tokens(&self, prefix: &[u8], limit: usize) -> Result<Vec<String>> {
        let cf = self.cf_handle(CF_INDICES)?;
        let mut tokens = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));
        for item in iter {
            if tokens.len() >= limit {
                break;
            }
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            tokens.push(
                String::from_utf8(value.to_vec())
                    .map_err(|_| Error::Storage("Malformed index token".to_string()))?,
            );
        }
        Ok(tokens)
    }
}

/// Big-endian inverted timestamp so forward iteration yields newest first
fn inverted_stamp(created_at: &DateTime<Utc>) -> [u8; 8] {
    let nanos = created_at.timestamp_nanos_opt().unwrap_or(0).max(0) as u64;
    (u64::MAX - nanos).to_be_bytes()
}

fn concat_key(parts: &[&[u8]]) -> Vec<u8> {
    let mut key = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Payment;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        (Storage::open(&config).unwrap(), temp_dir)
    }

    fn test_user(id: i64) -> User {
        User {
            user_id: UserId::new(id),
            username: format!("user{id}"),
            first_name: "Test".to_string(),
            main: Decimal::new(5000, 2),
            hold: Decimal::ZERO,
            referral: Decimal::ZERO,
            stars: 0,
            premium: false,
            referral_code: format!("REFTEST{id}"),
            referred_by: None,
            first_order_completed: false,
            joined_at: Utc::now(),
        }
    }

    fn test_order(token: &str, user_id: i64, created_at: DateTime<Utc>) -> Order {
        Order {
            token: OrderToken::new(token),
            user_id: UserId::new(user_id),
            package_id: 1,
            package_name: "1000 Stars".to_string(),
            payment: Payment::Balance {
                amount: Decimal::new(3000, 2),
            },
            user_input: "@buyer".to_string(),
            proof: Some("uploads/proof.png".to_string()),
            status: OrderStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let (storage, _temp) = test_storage();
        let user = test_user(1);

        storage.create_user(&user, None).unwrap();

        let retrieved = storage.user(UserId::new(1)).unwrap().unwrap();
        assert_eq!(retrieved, user);
        assert_eq!(storage.user(UserId::new(2)).unwrap(), None);
    }

    #[test]
    fn test_referral_code_lookup() {
        let (storage, _temp) = test_storage();
        let user = test_user(7);
        storage.create_user(&user, None).unwrap();

        let resolved = storage.user_by_referral_code("REFTEST7").unwrap();
        assert_eq!(resolved, Some(UserId::new(7)));
        assert_eq!(storage.user_by_referral_code("REFNOPE").unwrap(), None);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let (storage, _temp) = test_storage();
        let user = test_user(1);
        storage.create_user(&user, None).unwrap();

        let base = Utc::now();
        for (i, token) in ["ORD00000001", "ORD00000002", "ORD00000003"]
            .iter()
            .enumerate()
        {
            let order = test_order(token, 1, base + Duration::milliseconds(i as i64));
            storage.create_order(&order, &user).unwrap();
        }

        let recent = storage.recent_orders(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].token.as_str(), "ORD00000003");
        assert_eq!(recent[1].token.as_str(), "ORD00000002");
    }

    #[test]
    fn test_status_index_moves_on_transition() {
        let (storage, _temp) = test_storage();
        let user = test_user(1);
        storage.create_user(&user, None).unwrap();

        let mut order = test_order("ORD00000010", 1, Utc::now());
        storage.create_order(&order, &user).unwrap();
        assert_eq!(
            storage.count_orders_with_status(OrderStatus::Pending).unwrap(),
            1
        );

        let previous = order.status;
        order.status = OrderStatus::Success;
        storage
            .commit_order_transition(&order, previous, &[&user], None)
            .unwrap();

        assert_eq!(
            storage.count_orders_with_status(OrderStatus::Pending).unwrap(),
            0
        );
        assert_eq!(
            storage.count_orders_with_status(OrderStatus::Success).unwrap(),
            1
        );
    }

    #[test]
    fn test_user_history_scoped_to_user() {
        let (storage, _temp) = test_storage();
        let alice = test_user(1);
        let bob = test_user(2);
        storage.create_user(&alice, None).unwrap();
        storage.create_user(&bob, None).unwrap();

        let base = Utc::now();
        storage
            .create_order(&test_order("ORD00000021", 1, base), &alice)
            .unwrap();
        storage
            .create_order(
                &test_order("ORD00000022", 2, base + Duration::milliseconds(1)),
                &bob,
            )
            .unwrap();

        let alice_orders = storage.user_orders(UserId::new(1), 10).unwrap();
        assert_eq!(alice_orders.len(), 1);
        assert_eq!(alice_orders[0].token.as_str(), "ORD00000021");
    }

    #[test]
    fn test_deposit_round_trip_and_counts() {
        let (storage, _temp) = test_storage();
        let mut deposit = Deposit {
            token: DepositToken::new("DEP00000001"),
            user_id: UserId::new(1),
            amount: Decimal::new(1000, 2),
            method: crate::types::DepositMethod::Usdt,
            reference: "0xabc".to_string(),
            proof: None,
            status: DepositStatus::Processing,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        storage.create_deposit(&deposit).unwrap();
        assert_eq!(
            storage
                .count_deposits_with_status(DepositStatus::Processing)
                .unwrap(),
            1
        );

        let previous = deposit.status;
        deposit.status = DepositStatus::Approved;
        storage
            .commit_deposit_transition(&deposit, previous, None)
            .unwrap();

        let retrieved = storage
            .deposit(&DepositToken::new("DEP00000001"))
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.status, DepositStatus::Approved);
        assert_eq!(
            storage
                .count_deposits_with_status(DepositStatus::Processing)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_referral_link_storage() {
        let (storage, _temp) = test_storage();
        let referrer = test_user(1);
        storage.create_user(&referrer, None).unwrap();

        let mut referred = test_user(2);
        referred.referred_by = Some(UserId::new(1));
        let link = Referral {
            id: uuid::Uuid::new_v4(),
            referrer_id: UserId::new(1),
            referred_id: UserId::new(2),
            reward_amount: Decimal::ZERO,
            rewarded: false,
            created_at: Utc::now(),
        };
        storage.create_user(&referred, Some(&link)).unwrap();

        let found = storage
            .referral_by_referred(UserId::new(2))
            .unwrap()
            .unwrap();
        assert_eq!(found.referrer_id, UserId::new(1));
        assert!(!found.rewarded);

        let links = storage.referrals_of(UserId::new(1)).unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_stats() {
        let (storage, _temp) = test_storage();
        let user = test_user(1);
        storage.create_user(&user, None).unwrap();
        storage
            .create_order(&test_order("ORD00000031", 1, Utc::now()), &user)
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.processing_deposits, 0);
    }
}
