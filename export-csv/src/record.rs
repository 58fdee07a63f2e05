//! Records, field values and record-type descriptors.
//!
//! The exporter never knows the concrete type of what it writes. A record only
//! has to answer "what is the value of field `x`", and a [`ModelMeta`]
//! describes which fields a record type declares.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// A single cell value before it is turned into text.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Default text coercion used when no cleaner is registered for a field.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(true) => f.write_str("True"),
            FieldValue::Bool(false) => f.write_str("False"),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::DateTime(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Anything that can be exported row by row.
pub trait Record {
    /// Read a field directly by its identifier. `None` means the record has
    /// no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

impl Record for BTreeMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

/// Descriptor of one declared field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    verbose_name: Option<&'static str>,
    /// Generated by the data layer (surrogate keys and the like); never
    /// part of a derived field list.
    pub auto_created: bool,
}

impl FieldMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            verbose_name: None,
            auto_created: false,
        }
    }

    pub const fn auto(name: &'static str) -> Self {
        Self {
            name,
            verbose_name: None,
            auto_created: true,
        }
    }

    pub const fn verbose(self, verbose_name: &'static str) -> Self {
        Self {
            verbose_name: Some(verbose_name),
            ..self
        }
    }

    /// Human readable name: the explicit one, or the identifier with
    /// underscores turned into spaces.
    pub fn verbose_name(&self) -> String {
        match self.verbose_name {
            Some(v) => v.to_string(),
            None => self.name.replace('_', " "),
        }
    }
}

/// Record-type descriptor: the type name and its declared fields in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelMeta {
    pub name: &'static str,
    pub fields: &'static [FieldMeta],
}

impl ModelMeta {
    pub const fn new(name: &'static str, fields: &'static [FieldMeta]) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared fields that are not auto-created, in declaration order.
    pub fn concrete_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| !f.auto_created)
    }
}

/// A record type that can describe itself.
pub trait Model: Record {
    fn meta() -> &'static ModelMeta;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    static FIELDS: [FieldMeta; 3] = [
        FieldMeta::auto("id"),
        FieldMeta::new("last_updated"),
        FieldMeta::new("is_active").verbose("Is Active"),
    ];
    static META: ModelMeta = ModelMeta::new("Customer", &FIELDS);

    #[test]
    fn test_verbose_name_defaults_to_spaced_identifier() {
        assert_eq!(META.field("last_updated").unwrap().verbose_name(), "last updated");
        assert_eq!(META.field("is_active").unwrap().verbose_name(), "Is Active");
    }

    #[test]
    fn test_concrete_fields_skip_auto_created() {
        let names: Vec<_> = META.concrete_fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["last_updated", "is_active"]);
    }

    #[test]
    fn test_display_coercion() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Bool(true).to_string(), "True");
        assert_eq!(FieldValue::Int(-42).to_string(), "-42");
        assert_eq!(FieldValue::Float(12.5).to_string(), "12.5");
        let dt = Utc.with_ymd_and_hms(2016, 5, 1, 10, 30, 0).unwrap();
        assert_eq!(FieldValue::from(dt).to_string(), "2016-05-01 10:30:00+00:00");
    }

    #[test]
    fn test_option_conversion() {
        assert!(FieldValue::from(None::<i64>).is_null());
        assert_eq!(FieldValue::from(Some("x")), FieldValue::Text("x".into()));
    }

    #[test]
    fn test_map_record_and_reference_record() {
        let mut row = BTreeMap::new();
        row.insert("name".to_string(), FieldValue::from("Jimmie"));
        let by_ref = &row;
        assert_eq!(by_ref.field("name").unwrap().as_str(), Some("Jimmie"));
        assert!(by_ref.field("address").is_none());
    }
}
