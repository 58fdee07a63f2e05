//! Domain models of the demo bank.
//!
//! Each model implements [`export_csv::Record`] so it can be exported, and
//! [`export_csv::Model`] so exports can derive field lists, headers and
//! filenames from it.

pub mod account;
pub mod customer;
pub mod transaction;

pub use account::Account;
pub use customer::Customer;
pub use transaction::Transaction;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// Parse a timestamp stored as RFC 3339 text
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

pub fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.as_deref().map(parse_timestamp).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_normalizes_to_utc() {
        let parsed = parse_timestamp("2017-06-12T23:08:42-04:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2017, 6, 13, 3, 8, 42).unwrap());
    }

    #[test]
    fn test_parse_optional_timestamp() {
        assert_eq!(parse_optional_timestamp(None).unwrap(), None);
        assert!(parse_optional_timestamp(Some("yesterday".to_string())).is_err());
    }
}
