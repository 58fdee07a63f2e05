//! Error types for CSV export.

use thiserror::Error;

/// Everything that can go wrong while resolving or running an export.
///
/// `Configuration` and `Type` errors are raised before any byte is written.
/// The remaining variants can surface mid-stream, after the header or some
/// rows have already reached the sink.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required input (source, fields, headers, filename) could not be resolved.
    #[error("improperly configured: {0}")]
    Configuration(String),

    /// A configured value has the wrong shape.
    #[error("type error: {0}")]
    Type(String),

    /// The record has no field with this identifier and no extractor is registered.
    #[error("record has no field '{0}'")]
    MissingField(String),

    /// A registered extractor or cleaner failed.
    #[error("failed to produce value for field '{field}': {message}")]
    Extract { field: String, message: String },

    #[error("csv writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid export settings: {0}")]
    Settings(#[from] serde_yaml::Error),
}

impl ExportError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        ExportError::Configuration(message.into())
    }

    /// Build an `Extract` error; convenient inside extractor and cleaner closures.
    pub fn extract(field: impl Into<String>, message: impl ToString) -> Self {
        ExportError::Extract {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// True for the errors that are guaranteed to fire before any output.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExportError::Configuration(_) | ExportError::Type(_))
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(ExportError::configuration("no model").is_configuration());
        assert!(ExportError::Type("col_names must be a list".into()).is_configuration());
        assert!(!ExportError::MissingField("name".into()).is_configuration());
    }

    #[test]
    fn test_extract_error_message() {
        let err = ExportError::extract("balance", "account closed");
        assert_eq!(
            err.to_string(),
            "failed to produce value for field 'balance': account closed"
        );
    }
}
