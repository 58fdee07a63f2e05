use chrono::{DateTime, Utc};
use export_csv::{FieldMeta, FieldValue, Model, ModelMeta, Record};

static ACCOUNT_FIELDS: [FieldMeta; 7] = [
    FieldMeta::auto("id"),
    FieldMeta::new("owner"),
    FieldMeta::new("account_no"),
    FieldMeta::new("balance"),
    FieldMeta::new("creation_date"),
    FieldMeta::new("last_withdrawn"),
    FieldMeta::new("last_deposited"),
];

static ACCOUNT_META: ModelMeta = ModelMeta::new("Account", &ACCOUNT_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub owner_id: i64,
    /// Name of the owning customer, which is how the owner is displayed
    pub owner: String,
    pub account_no: String,
    pub balance: f64,
    pub creation_date: Option<DateTime<Utc>>,
    pub last_withdrawn: Option<DateTime<Utc>>,
    pub last_deposited: Option<DateTime<Utc>>,
    pub transaction_count: i64,
}

impl Account {
    /// Apply a saved transaction's exchange to this account.
    pub fn apply_exchange(&mut self, exchange: f64, at: DateTime<Utc>) {
        self.balance += exchange;
        if exchange > 0.0 {
            self.last_deposited = Some(at);
        } else {
            self.last_withdrawn = Some(at);
        }
    }

    pub fn to_dto(&self) -> shared::Account {
        shared::Account {
            id: self.id,
            owner_id: self.owner_id,
            owner: self.owner.clone(),
            account_no: self.account_no.clone(),
            balance: self.balance,
            creation_date: self.creation_date,
            last_withdrawn: self.last_withdrawn,
            last_deposited: self.last_deposited,
            transaction_count: self.transaction_count,
        }
    }
}

impl Record for Account {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "id" => self.id.into(),
            "owner" => self.owner.as_str().into(),
            "account_no" => self.account_no.as_str().into(),
            "balance" => self.balance.into(),
            "creation_date" => self.creation_date.into(),
            "last_withdrawn" => self.last_withdrawn.into(),
            "last_deposited" => self.last_deposited.into(),
            "transaction_count" => self.transaction_count.into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Model for Account {
    fn meta() -> &'static ModelMeta {
        &ACCOUNT_META
    }
}
