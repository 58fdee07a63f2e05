//! Bank service domain logic for the demo.
//!
//! All record mutations go through this service so that the registered
//! event handlers see every saved record.

use std::ops::Range;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::db::{DbConnection, TransactionOrder};
use crate::domain::events::{AccountBalanceUpdater, EventHandler, RecordEvent};
use crate::domain::models::{Account, Customer, Transaction};

const HEX_DIGITS: &[u8] = b"0123456789ABCDEF";
const ACCOUNT_NO_LEN: usize = 5;
const TRANSACTION_ID_LEN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Transaction cannot be completed. Requested amount is greater than account balance.")]
    InsufficientFunds {
        account_no: String,
        balance: f64,
        exchange: f64,
    },
    #[error("Account {0} not found")]
    AccountNotFound(i64),
}

#[derive(Clone)]
pub struct BankService {
    db: DbConnection,
    handlers: Vec<Arc<dyn EventHandler>>,
    rng: Arc<Mutex<StdRng>>,
}

impl BankService {
    pub fn new(db: DbConnection) -> Self {
        Self::with_rng(db, StdRng::from_entropy())
    }

    pub fn with_rng(db: DbConnection, rng: StdRng) -> Self {
        Self {
            db,
            handlers: vec![Arc::new(AccountBalanceUpdater)],
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Same database and handlers, fresh deterministic random source.
    pub fn reseeded(&self, seed: u64) -> Self {
        Self {
            db: self.db.clone(),
            handlers: self.handlers.clone(),
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub async fn create_customer(&self, name: &str, address: &str) -> Result<Customer> {
        let last_updated = Utc::now();
        let id = self.db.insert_customer(name, address, true, last_updated).await?;
        info!("Created customer {} ({})", id, name);
        Ok(Customer {
            id,
            name: name.to_string(),
            address: address.to_string(),
            is_active: true,
            last_updated,
        })
    }

    /// Open an account with a freshly generated account number.
    pub async fn open_account(&self, owner_id: i64, balance: f64) -> Result<Account> {
        let account_no = self.random_hex(ACCOUNT_NO_LEN);
        let id = self
            .db
            .insert_account(owner_id, &account_no, balance, Utc::now())
            .await?;
        info!("Opened account {} for customer {} with balance {:.2}", account_no, owner_id, balance);
        Ok(self.db.get_account(id).await?.ok_or(BankError::AccountNotFound(id))?)
    }

    /// Record a deposit (positive exchange) or withdrawal (negative exchange).
    ///
    /// Fails with [`BankError::InsufficientFunds`] if the account balance
    /// would drop below zero; nothing is saved in that case.
    pub async fn record_transaction(
        &self,
        account_id: i64,
        exchange: f64,
        is_fraudulent: bool,
    ) -> Result<Transaction> {
        let account = self
            .db
            .get_account(account_id)
            .await?
            .ok_or(BankError::AccountNotFound(account_id))?;

        if account.balance + exchange < 0.0 {
            return Err(BankError::InsufficientFunds {
                account_no: account.account_no,
                balance: account.balance,
                exchange,
            }
            .into());
        }

        let transaction_date = Utc::now();
        let transaction_id = self.random_hex(TRANSACTION_ID_LEN);
        let id = self
            .db
            .insert_transaction(account_id, &transaction_id, transaction_date, exchange, is_fraudulent)
            .await?;

        let transaction = Transaction {
            id,
            account_id,
            account: account.account_no,
            transaction_id,
            transaction_date,
            exchange,
            is_fraudulent,
            is_reviewed: false,
        };
        if let Err(e) = self.dispatch(RecordEvent::TransactionSaved(&transaction)).await {
            warn!("Rolling back transaction {} after failed handler: {}", transaction.transaction_id, e);
            self.db.delete_transaction(id).await?;
            return Err(e);
        }
        Ok(transaction)
    }

    pub async fn count_customers(&self) -> Result<i64> {
        self.db.count_customers().await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.db.list_customers().await
    }

    pub async fn list_accounts(&self, min_balance: Option<f64>) -> Result<Vec<Account>> {
        self.db.list_accounts(min_balance).await
    }

    pub async fn list_transactions(&self, order: TransactionOrder) -> Result<Vec<Transaction>> {
        self.db.list_transactions(order).await
    }

    pub fn random_range(&self, range: Range<i64>) -> i64 {
        self.rng().gen_range(range)
    }

    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng().gen_bool(probability)
    }

    fn random_hex(&self, len: usize) -> String {
        let mut rng = self.rng();
        (0..len)
            .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
            .collect()
    }

    fn rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn dispatch(&self, event: RecordEvent<'_>) -> Result<()> {
        for handler in &self.handlers {
            debug!("Dispatching {:?}", event);
            handler.handle(&self.db, event).await?;
        }
        Ok(())
    }
}
