use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::domain::models::{parse_optional_timestamp, parse_timestamp, Account, Customer, Transaction};

/// Order in which transactions are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOrder {
    /// Insertion order
    Created,
    TransactionId,
}

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database if it doesn't exist
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                last_updated TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
                account_no TEXT NOT NULL,
                balance REAL NOT NULL,
                creation_date TEXT,
                last_withdrawn TEXT,
                last_deposited TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                transaction_id TEXT NOT NULL,
                transaction_date TEXT NOT NULL,
                exchange REAL NOT NULL,
                is_fraudulent INTEGER NOT NULL DEFAULT 0,
                is_reviewed INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn count_customers(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM customers")
            .fetch_one(self.pool())
            .await?;
        Ok(row.get("count"))
    }

    /// Insert a customer and return its id
    pub async fn insert_customer(
        &self,
        name: &str,
        address: &str,
        is_active: bool,
        last_updated: DateTime<Utc>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO customers (name, address, is_active, last_updated) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(address)
        .bind(is_active)
        .bind(last_updated.to_rfc3339())
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, name, address, is_active, last_updated FROM customers ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(customer_from_row).collect()
    }

    /// Insert an account and return its id
    pub async fn insert_account(
        &self,
        owner_id: i64,
        account_no: &str,
        balance: f64,
        creation_date: DateTime<Utc>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO accounts (owner_id, account_no, balance, creation_date) VALUES (?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(account_no)
        .bind(balance)
        .bind(creation_date.to_rfc3339())
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Persist balance and activity timestamps of an existing account
    pub async fn update_account(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = ?, last_withdrawn = ?, last_deposited = ?
            WHERE id = ?
            "#,
        )
        .bind(account.balance)
        .bind(account.last_withdrawn.map(|d| d.to_rfc3339()))
        .bind(account.last_deposited.map(|d| d.to_rfc3339()))
        .bind(account.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn get_account(&self, account_id: i64) -> Result<Option<Account>> {
        let row = sqlx::query(&format!("{} WHERE a.id = ?", ACCOUNT_SELECT))
            .bind(account_id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    /// List accounts, optionally only those with a balance strictly above `min_balance`
    pub async fn list_accounts(&self, min_balance: Option<f64>) -> Result<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "{} WHERE (? IS NULL OR a.balance > ?) ORDER BY a.id",
            ACCOUNT_SELECT
        ))
        .bind(min_balance)
        .bind(min_balance)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(account_from_row).collect()
    }

    /// Insert a transaction and return its id
    pub async fn insert_transaction(
        &self,
        account_id: i64,
        transaction_id: &str,
        transaction_date: DateTime<Utc>,
        exchange: f64,
        is_fraudulent: bool,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (account_id, transaction_id, transaction_date, exchange, is_fraudulent)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account_id)
        .bind(transaction_id)
        .bind(transaction_date.to_rfc3339())
        .bind(exchange)
        .bind(is_fraudulent)
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn list_transactions(&self, order: TransactionOrder) -> Result<Vec<Transaction>> {
        let order_by = match order {
            TransactionOrder::Created => "t.id",
            TransactionOrder::TransactionId => "t.transaction_id",
        };
        let rows = sqlx::query(&format!(
            r#"
            SELECT t.id, t.account_id, a.account_no, t.transaction_id, t.transaction_date,
                   t.exchange, t.is_fraudulent, t.is_reviewed
            FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            ORDER BY {}
            "#,
            order_by
        ))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(transaction_from_row).collect()
    }
}

const ACCOUNT_SELECT: &str = r#"
    SELECT a.id, a.owner_id, c.name AS owner, a.account_no, a.balance,
           a.creation_date, a.last_withdrawn, a.last_deposited,
           (SELECT COUNT(*) FROM transactions t WHERE t.account_id = a.id) AS transaction_count
    FROM accounts a
    JOIN customers c ON c.id = a.owner_id
"#;

fn customer_from_row(r: &SqliteRow) -> Result<Customer> {
    Ok(Customer {
        id: r.get("id"),
        name: r.get("name"),
        address: r.get("address"),
        is_active: r.get("is_active"),
        last_updated: parse_timestamp(r.get("last_updated"))?,
    })
}

fn account_from_row(r: &SqliteRow) -> Result<Account> {
    Ok(Account {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        owner: r.get("owner"),
        account_no: r.get("account_no"),
        balance: r.get("balance"),
        creation_date: parse_optional_timestamp(r.get("creation_date"))?,
        last_withdrawn: parse_optional_timestamp(r.get("last_withdrawn"))?,
        last_deposited: parse_optional_timestamp(r.get("last_deposited"))?,
        transaction_count: r.get("transaction_count"),
    })
}

fn transaction_from_row(r: &SqliteRow) -> Result<Transaction> {
    Ok(Transaction {
        id: r.get("id"),
        account_id: r.get("account_id"),
        account: r.get("account_no"),
        transaction_id: r.get("transaction_id"),
        transaction_date: parse_timestamp(r.get("transaction_date"))?,
        exchange: r.get("exchange"),
        is_fraudulent: r.get("is_fraudulent"),
        is_reviewed: r.get("is_reviewed"),
    })
}
