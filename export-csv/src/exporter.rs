//! The export pipeline.
//!
//! A [`CsvExporter`] is built once per request, then consumed by
//! [`CsvExporter::write_to`] or [`CsvExporter::into_response`]. Each input
//! (record source, field names, column headers, filename, writer options) is
//! resolved by its own method: an explicitly configured value always wins,
//! otherwise a default is derived from the model descriptor, otherwise the
//! resolver fails with [`ExportError::Configuration`].

use std::collections::HashMap;
use std::fmt;
use std::io;

use tracing::{debug, info, warn};

use crate::error::{ExportError, ExportResult};
use crate::options::{ColumnNames, ExportSettings, WriterOptions};
use crate::record::{FieldValue, Model, ModelMeta, Record};
use crate::response::{CsvResponse, ExportSummary};

type Extractor<R> = Box<dyn Fn(&R) -> ExportResult<FieldValue> + Send + Sync>;
type Cleaner = Box<dyn Fn(FieldValue) -> ExportResult<String> + Send + Sync>;

/// Per-field overrides, keyed by field identifier.
///
/// An extractor computes the raw value from the record; a cleaner turns the
/// raw value into the final cell text. Either one may be missing.
pub struct FieldHooks<R> {
    extractors: HashMap<String, Extractor<R>>,
    cleaners: HashMap<String, Cleaner>,
}

impl<R> Default for FieldHooks<R> {
    fn default() -> Self {
        Self {
            extractors: HashMap::new(),
            cleaners: HashMap::new(),
        }
    }
}

impl<R: Record> FieldHooks<R> {
    pub fn has_extractor(&self, field: &str) -> bool {
        self.extractors.contains_key(field)
    }

    pub fn has_cleaner(&self, field: &str) -> bool {
        self.cleaners.contains_key(field)
    }

    fn extract(&self, field: &str, record: &R) -> ExportResult<FieldValue> {
        match self.extractors.get(field) {
            Some(extractor) => extractor(record),
            None => record
                .field(field)
                .ok_or_else(|| ExportError::MissingField(field.to_string())),
        }
    }

    fn clean(&self, field: &str, value: FieldValue) -> ExportResult<String> {
        match self.cleaners.get(field) {
            Some(cleaner) => cleaner(value),
            None => Ok(value.to_string()),
        }
    }
}

impl<R> fmt::Debug for FieldHooks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHooks")
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .field("cleaners", &self.cleaners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Configurable exporter of a record source into CSV.
pub struct CsvExporter<S>
where
    S: IntoIterator,
{
    model: Option<&'static ModelMeta>,
    source: Option<S>,
    field_names: Vec<String>,
    filename: Option<String>,
    add_col_names: bool,
    col_names: Option<ColumnNames>,
    writer_options: WriterOptions,
    hooks: FieldHooks<S::Item>,
}

impl<S> Default for CsvExporter<S>
where
    S: IntoIterator,
    S::Item: Record,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CsvExporter<S>
where
    S: IntoIterator,
    S::Item: Record,
{
    /// An exporter with nothing configured.
    pub fn new() -> Self {
        Self {
            model: None,
            source: None,
            field_names: Vec::new(),
            filename: None,
            add_col_names: false,
            col_names: None,
            writer_options: WriterOptions::excel(),
            hooks: FieldHooks::default(),
        }
    }

    /// An exporter whose defaults are derived from `M`'s descriptor.
    pub fn for_model<M: Model>() -> Self {
        Self::new().model(M::meta())
    }

    pub fn model(mut self, meta: &'static ModelMeta) -> Self {
        self.model = Some(meta);
        self
    }

    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    pub fn field_names<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.field_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Write a header row first. Off by default.
    pub fn add_col_names(mut self, add: bool) -> Self {
        self.add_col_names = add;
        self
    }

    pub fn col_names(mut self, names: impl Into<ColumnNames>) -> Self {
        self.col_names = Some(names.into());
        self
    }

    pub fn writer_options(mut self, options: WriterOptions) -> Self {
        self.writer_options = options;
        self
    }

    /// Apply declarative settings. Values missing from `settings` leave the
    /// current configuration untouched; the writer options are replaced.
    pub fn settings(mut self, settings: ExportSettings) -> Self {
        if settings.filename.is_some() {
            self.filename = settings.filename;
        }
        if !settings.field_names.is_empty() {
            self.field_names = settings.field_names;
        }
        if settings.col_names.is_some() {
            self.col_names = settings.col_names;
        }
        self.add_col_names = self.add_col_names || settings.add_col_names;
        self.writer_options = settings.writer;
        self
    }

    /// Compute `field` with `extractor` instead of reading it off the record.
    pub fn extractor_for<F>(mut self, field: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&S::Item) -> ExportResult<FieldValue> + Send + Sync + 'static,
    {
        self.hooks.extractors.insert(field.into(), Box::new(extractor));
        self
    }

    /// Reshape the extracted value of `field` with `cleaner` instead of the
    /// default text coercion.
    pub fn cleaner_for<F>(mut self, field: impl Into<String>, cleaner: F) -> Self
    where
        F: Fn(FieldValue) -> ExportResult<String> + Send + Sync + 'static,
    {
        self.hooks.cleaners.insert(field.into(), Box::new(cleaner));
        self
    }

    pub fn hooks(&self) -> &FieldHooks<S::Item> {
        &self.hooks
    }

    /// Hand out the configured record source. The source is moved out as is,
    /// so this succeeds at most once per exporter.
    pub fn resolve_record_source(&mut self) -> ExportResult<S> {
        self.source.take().ok_or_else(|| {
            ExportError::configuration(
                "No record source to export. Either provide a source or build the exporter with one.",
            )
        })
    }

    /// Explicit field names if any, else every non auto-created field of the model.
    pub fn resolve_field_names(&self) -> ExportResult<Vec<String>> {
        if !self.field_names.is_empty() {
            return Ok(self.field_names.clone());
        }
        match self.model {
            Some(model) => Ok(model.concrete_fields().map(|f| f.name.to_string()).collect()),
            None => Err(ExportError::configuration(
                "No model to get field names from. Either provide a model or field names.",
            )),
        }
    }

    /// Explicit column names if any, else the verbose names of the resolved fields.
    pub fn resolve_column_headers(&self) -> ExportResult<Vec<String>> {
        if let Some(names) = self.explicit_col_names()? {
            return Ok(names);
        }
        let fields = self.resolve_field_names()?;
        self.verbose_names(&fields)
    }

    /// Explicit filename, else `<model name>_list.csv`.
    pub fn resolve_filename(&self) -> ExportResult<String> {
        if let Some(filename) = &self.filename {
            return Ok(filename.clone());
        }
        match self.model {
            Some(model) => Ok(format!("{}_list.csv", model.name.to_lowercase())),
            None => Err(ExportError::configuration(
                "No model to generate filename. Either provide a model or a filename.",
            )),
        }
    }

    pub fn resolve_writer_options(&self) -> &WriterOptions {
        &self.writer_options
    }

    fn explicit_col_names(&self) -> ExportResult<Option<Vec<String>>> {
        match &self.col_names {
            Some(ColumnNames::List(names)) if !names.is_empty() => Ok(Some(names.clone())),
            Some(ColumnNames::Text(text)) if !text.is_empty() => {
                Err(ExportError::Type("col_names must be a list".to_string()))
            }
            _ => Ok(None),
        }
    }

    fn verbose_names(&self, fields: &[String]) -> ExportResult<Vec<String>> {
        let model = self.model.ok_or_else(|| {
            ExportError::configuration("No model to get verbose field names from.")
        })?;
        Ok(fields
            .iter()
            .map(|name| match model.field(name) {
                Some(meta) => meta.verbose_name(),
                None => name.replace('_', " "),
            })
            .collect())
    }

    /// Stream the export into `sink`.
    ///
    /// Every input is resolved before the first byte is written. A failure
    /// while producing a row aborts the export; whatever was already written
    /// to `sink` stays there.
    pub fn write_to<W: io::Write>(mut self, sink: W) -> ExportResult<ExportSummary> {
        let source = self.resolve_record_source()?;
        let fields = self.resolve_field_names()?;
        let headers = if self.add_col_names {
            match self.explicit_col_names()? {
                Some(names) => names,
                None => self.verbose_names(&fields)?,
            }
        } else {
            Vec::new()
        };
        let filename = self.resolve_filename()?;
        let mut writer = self.writer_options.writer_builder()?.from_writer(sink);

        debug!("Exporting {} with fields {:?}", filename, fields);
        if !headers.is_empty() && headers.len() != fields.len() {
            warn!(
                "Export {} has {} column names for {} fields",
                filename,
                headers.len(),
                fields.len()
            );
        }

        let header_written = !headers.is_empty();
        if header_written {
            for name in &headers {
                self.writer_options.check_unquoted_cell(name)?;
            }
            writer.write_record(&headers)?;
        }

        let mut records_written = 0;
        let mut row = Vec::with_capacity(fields.len());
        for record in source {
            row.clear();
            for field in &fields {
                let value = self.hooks.extract(field, &record)?;
                let cell = self.hooks.clean(field, value)?;
                self.writer_options.check_unquoted_cell(&cell)?;
                row.push(cell);
            }
            writer.write_record(&row)?;
            records_written += 1;
        }
        writer.flush()?;

        info!("Exported {} records to {}", records_written, filename);
        Ok(ExportSummary {
            filename,
            header_written,
            records_written,
        })
    }

    /// Render the whole export into a [`CsvResponse`].
    pub fn into_response(self) -> ExportResult<CsvResponse> {
        let mut body = Vec::new();
        let summary = self.write_to(&mut body)?;
        Ok(CsvResponse::new(summary.filename, body))
    }
}
