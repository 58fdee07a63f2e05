//! Writer dialect and YAML-loadable export settings.

use std::fs;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// When the writer wraps a cell in the quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Only cells containing the delimiter, the quote character or a line break.
    #[default]
    Minimal,
    All,
    /// Every non-numeric cell. Cells are already text when they reach the
    /// writer, so in practice every cell is quoted, same as `All`.
    NonNumeric,
    /// Never quote. A cell that would need quoting is an error.
    None,
}

impl From<Quoting> for QuoteStyle {
    fn from(q: Quoting) -> Self {
        match q {
            Quoting::Minimal => QuoteStyle::Necessary,
            Quoting::All => QuoteStyle::Always,
            Quoting::NonNumeric => QuoteStyle::Always,
            Quoting::None => QuoteStyle::Never,
        }
    }
}

/// Writer-level options. Characters are kept as strings so that settings
/// files can hold anything; the shape is checked when the writer is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub delimiter: String,
    pub quotechar: String,
    pub quoting: Quoting,
    pub lineterminator: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::excel()
    }
}

impl WriterOptions {
    /// Comma separated, double quotes, quote only when needed, CRLF rows.
    pub fn excel() -> Self {
        Self {
            delimiter: ",".to_string(),
            quotechar: "\"".to_string(),
            quoting: Quoting::Minimal,
            lineterminator: "\r\n".to_string(),
        }
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn quotechar(mut self, quotechar: impl Into<String>) -> Self {
        self.quotechar = quotechar.into();
        self
    }

    pub fn quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn lineterminator(mut self, lineterminator: impl Into<String>) -> Self {
        self.lineterminator = lineterminator.into();
        self
    }

    /// Validate the options and turn them into a configured `csv::WriterBuilder`.
    pub fn writer_builder(&self) -> ExportResult<WriterBuilder> {
        let delimiter = single_byte("delimiter", &self.delimiter)?;
        let quote = single_byte("quotechar", &self.quotechar)?;
        let terminator = match self.lineterminator.as_str() {
            "\r\n" => Terminator::CRLF,
            other => Terminator::Any(single_byte("lineterminator", other)?),
        };

        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quote(quote)
            .quote_style(self.quoting.into())
            .terminator(terminator);
        Ok(builder)
    }

    /// Under `Quoting::None` a cell holding the delimiter, the quote character
    /// or a line break cannot be written without splitting or breaking the row.
    pub fn check_unquoted_cell(&self, cell: &str) -> ExportResult<()> {
        if self.quoting != Quoting::None {
            return Ok(());
        }
        let special = |b: u8| {
            b == b'\r'
                || b == b'\n'
                || self.delimiter.as_bytes().contains(&b)
                || self.quotechar.as_bytes().contains(&b)
                || self.lineterminator.as_bytes().contains(&b)
        };
        if cell.bytes().any(special) {
            return Err(ExportError::Type(format!(
                "cell {:?} needs quoting but quoting is \"none\"",
                cell
            )));
        }
        Ok(())
    }
}

fn single_byte(option: &str, value: &str) -> ExportResult<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(ExportError::Type(format!(
            "\"{}\" must be a 1-character ASCII string, got {:?}",
            option, value
        ))),
    }
}

/// Column headers as configured. Only `List` is a valid shape; `Text` is what
/// a settings file produces when a single string is given instead of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnNames {
    List(Vec<String>),
    Text(String),
}

impl From<Vec<String>> for ColumnNames {
    fn from(names: Vec<String>) -> Self {
        ColumnNames::List(names)
    }
}

impl From<Vec<&str>> for ColumnNames {
    fn from(names: Vec<&str>) -> Self {
        ColumnNames::List(names.into_iter().map(String::from).collect())
    }
}

impl From<&str> for ColumnNames {
    fn from(text: &str) -> Self {
        ColumnNames::Text(text.to_string())
    }
}

/// The declarative part of an export, loadable from YAML.
///
/// ```yaml
/// filename: transactions_csv_filename.csv
/// field_names: [account, transaction_id, transaction_date]
/// add_col_names: true
/// writer:
///   delimiter: " "
///   quotechar: "|"
///   quoting: all
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub filename: Option<String>,
    pub field_names: Vec<String>,
    pub add_col_names: bool,
    pub col_names: Option<ColumnNames>,
    pub writer: WriterOptions,
}

impl ExportSettings {
    pub fn from_yaml_str(yaml: &str) -> ExportResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
