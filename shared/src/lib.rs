//! Wire types shared between the demo server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    /// Set by the server every time the customer is saved
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner_id: i64,
    /// Display name of the owning customer
    pub owner: String,
    /// Five uppercase hex characters, assigned when the account is opened
    pub account_no: String,
    pub balance: f64,
    pub creation_date: Option<DateTime<Utc>>,
    pub last_withdrawn: Option<DateTime<Utc>>,
    pub last_deposited: Option<DateTime<Utc>>,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    /// Account number of the account this transaction belongs to
    pub account: String,
    /// Ten uppercase hex characters
    pub transaction_id: String,
    pub transaction_date: DateTime<Utc>,
    /// Positive for deposits, negative for withdrawals
    pub exchange: f64,
    pub is_fraudulent: bool,
    pub is_reviewed: bool,
}

impl Transaction {
    pub fn is_deposit(&self) -> bool {
        self.exchange > 0.0
    }

    pub fn deposit_or_withdrawal(&self) -> &'static str {
        if self.is_deposit() {
            "deposit"
        } else {
            "withdrawal"
        }
    }
}

/// Everything the index page lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    /// Ordered by `transaction_id`
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn transaction(exchange: f64) -> Transaction {
        Transaction {
            id: 1,
            account_id: 1,
            account: "A1B2C".to_string(),
            transaction_id: "0123456789".to_string(),
            transaction_date: Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap(),
            exchange,
            is_fraudulent: false,
            is_reviewed: false,
        }
    }

    #[test]
    fn test_deposit_or_withdrawal() {
        assert_eq!(transaction(250.0).deposit_or_withdrawal(), "deposit");
        assert_eq!(transaction(-250.0).deposit_or_withdrawal(), "withdrawal");
        assert!(!transaction(0.0).is_deposit());
    }

    #[test]
    fn test_index_response_serializes() {
        let index = IndexResponse {
            customers: Vec::new(),
            accounts: Vec::new(),
            transactions: vec![transaction(10.0)],
        };
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["transactions"][0]["transaction_id"], "0123456789");
        let back: IndexResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, index);
    }
}
