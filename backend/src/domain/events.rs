//! Record events and their handlers.
//!
//! The bank service dispatches an event after every record mutation it
//! performs. Handlers run in registration order; the first failing handler
//! stops dispatch and its error is returned to the caller.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::db::DbConnection;
use crate::domain::models::Transaction;

#[derive(Debug, Clone, Copy)]
pub enum RecordEvent<'a> {
    TransactionSaved(&'a Transaction),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, db: &DbConnection, event: RecordEvent<'_>) -> Result<()>;
}

/// Keeps an account's balance and activity timestamps in step with its transactions.
pub struct AccountBalanceUpdater;

#[async_trait]
impl EventHandler for AccountBalanceUpdater {
    async fn handle(&self, db: &DbConnection, event: RecordEvent<'_>) -> Result<()> {
        let RecordEvent::TransactionSaved(transaction) = event;

        let mut account = db
            .get_account(transaction.account_id)
            .await?
            .ok_or_else(|| anyhow!("Account {} not found", transaction.account_id))?;

        account.apply_exchange(transaction.exchange, Utc::now());
        db.update_account(&account).await?;

        info!(
            "Account {} balance updated by {:.2} to {:.2}",
            account.account_no, transaction.exchange, account.balance
        );
        Ok(())
    }
}
