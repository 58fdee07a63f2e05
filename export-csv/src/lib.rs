//! # export-csv
//!
//! Generic export of a record set into a downloadable CSV file.
//!
//! A [`CsvExporter`] combines a record source, a field list, optional column
//! headers and a filename, then writes one CSV row per record. Defaults for
//! fields, headers and filename come from the record type's [`ModelMeta`];
//! anything configured explicitly takes precedence.
//!
//! Per-field behaviour is customised with two kinds of hooks:
//! - an **extractor** computes a field's raw value from the record
//!   (for values that are not stored on it directly);
//! - a **cleaner** turns the raw value into the final cell text.
//!
//! ```no_run
//! use export_csv::{CsvExporter, FieldValue, Quoting, WriterOptions};
//! # use export_csv::{FieldMeta, Model, ModelMeta, Record};
//! # struct Transaction { transaction_id: String }
//! # impl Record for Transaction {
//! #     fn field(&self, name: &str) -> Option<FieldValue> {
//! #         (name == "transaction_id").then(|| self.transaction_id.as_str().into())
//! #     }
//! # }
//! # static FIELDS: [FieldMeta; 1] = [FieldMeta::new("transaction_id")];
//! # static META: ModelMeta = ModelMeta::new("Transaction", &FIELDS);
//! # impl Model for Transaction { fn meta() -> &'static ModelMeta { &META } }
//! # let transactions: Vec<Transaction> = Vec::new();
//! let response = CsvExporter::for_model::<Transaction>()
//!     .source(transactions)
//!     .field_names(["transaction_id"])
//!     .writer_options(WriterOptions::excel().quoting(Quoting::All))
//!     .cleaner_for("transaction_id", |v| Ok(v.to_string().to_lowercase()))
//!     .into_response()?;
//! assert_eq!(response.filename(), "transaction_list.csv");
//! # Ok::<(), export_csv::ExportError>(())
//! ```
//!
//! [`CsvResponse`] implements `axum::response::IntoResponse`, so a handler
//! can return it directly.

pub mod error;
pub mod exporter;
pub mod options;
pub mod record;
pub mod response;

pub use error::{ExportError, ExportResult};
pub use exporter::{CsvExporter, FieldHooks};
pub use options::{ColumnNames, ExportSettings, Quoting, WriterOptions};
pub use record::{FieldMeta, FieldValue, Model, ModelMeta, Record};
pub use response::{CsvResponse, ExportSummary, CSV_CONTENT_TYPE};
