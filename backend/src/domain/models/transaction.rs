use chrono::{DateTime, Utc};
use export_csv::{FieldMeta, FieldValue, Model, ModelMeta, Record};

static TRANSACTION_FIELDS: [FieldMeta; 7] = [
    FieldMeta::auto("id"),
    FieldMeta::new("account"),
    FieldMeta::new("transaction_id"),
    FieldMeta::new("transaction_date"),
    FieldMeta::new("exchange"),
    FieldMeta::new("is_fraudulent"),
    FieldMeta::new("is_reviewed"),
];

static TRANSACTION_META: ModelMeta = ModelMeta::new("Transaction", &TRANSACTION_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    /// Account number of the owning account
    pub account: String,
    pub transaction_id: String,
    pub transaction_date: DateTime<Utc>,
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

    pub fn to_dto(&self) -> shared::Transaction {
        shared::Transaction {
            id: self.id,
            account_id: self.account_id,
            account: self.account.clone(),
            transaction_id: self.transaction_id.clone(),
            transaction_date: self.transaction_date,
            exchange: self.exchange,
            is_fraudulent: self.is_fraudulent,
            is_reviewed: self.is_reviewed,
        }
    }
}

impl Record for Transaction {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "id" => self.id.into(),
            "account" => self.account.as_str().into(),
            "transaction_id" => self.transaction_id.as_str().into(),
            "transaction_date" => self.transaction_date.into(),
            "exchange" => self.exchange.into(),
            "is_fraudulent" => self.is_fraudulent.into(),
            "is_reviewed" => self.is_reviewed.into(),
            "is_deposit" => self.is_deposit().into(),
            "deposit_or_withdrawal" => self.deposit_or_withdrawal().into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Model for Transaction {
    fn meta() -> &'static ModelMeta {
        &TRANSACTION_META
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_derived_fields() {
        let tx = Transaction {
            id: 9,
            account_id: 2,
            account: "7C0DE".to_string(),
            transaction_id: "ABCDEF0123".to_string(),
            transaction_date: Utc.with_ymd_and_hms(2017, 2, 3, 4, 5, 6).unwrap(),
            exchange: -1200.0,
            is_fraudulent: true,
            is_reviewed: false,
        };

        assert_eq!(tx.field("deposit_or_withdrawal").unwrap().to_string(), "withdrawal");
        assert_eq!(tx.field("is_deposit"), Some(FieldValue::Bool(false)));
        assert_eq!(tx.field("account").unwrap().to_string(), "7C0DE");
        assert_eq!(Transaction::meta().name, "Transaction");
    }
}
