use chrono::{DateTime, Utc};
use export_csv::{FieldMeta, FieldValue, Model, ModelMeta, Record};

static CUSTOMER_FIELDS: [FieldMeta; 5] = [
    FieldMeta::auto("id"),
    FieldMeta::new("name"),
    FieldMeta::new("address"),
    FieldMeta::new("is_active").verbose("Is Active"),
    FieldMeta::new("last_updated"),
];

static CUSTOMER_META: ModelMeta = ModelMeta::new("Customer", &CUSTOMER_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    pub last_updated: DateTime<Utc>,
}

impl Customer {
    pub fn to_dto(&self) -> shared::Customer {
        shared::Customer {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            is_active: self.is_active,
            last_updated: self.last_updated,
        }
    }
}

impl Record for Customer {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "address" => self.address.as_str().into(),
            "is_active" => self.is_active.into(),
            "last_updated" => self.last_updated.into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Model for Customer {
    fn meta() -> &'static ModelMeta {
        &CUSTOMER_META
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_customer_record_fields() {
        let customer = Customer {
            id: 3,
            name: "Butch Coolidge".to_string(),
            address: "2934 Riverside Drive Los Angeles, CA 90039".to_string(),
            is_active: false,
            last_updated: Utc.with_ymd_and_hms(2017, 1, 2, 3, 4, 5).unwrap(),
        };

        assert_eq!(customer.field("name"), Some(FieldValue::from("Butch Coolidge")));
        assert_eq!(customer.field("is_active"), Some(FieldValue::Bool(false)));
        assert_eq!(customer.field("balance"), None);
        assert_eq!(customer.to_dto().name, "Butch Coolidge");
    }

    #[test]
    fn test_customer_meta() {
        let names: Vec<_> = Customer::meta().concrete_fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "address", "is_active", "last_updated"]);
    }
}
