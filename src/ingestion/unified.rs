//! Unified import entrypoint.
//!
//! Most callers should use [`import_employees`], which reads an uploaded file, turns its rows
//! into employee records and persists them in one [`EmployeeStore::save_all`] call.
//!
//! - If [`ImportOptions::format`] is `None`, the format is inferred from the declared filename.
//! - If an [`super::observability::ImportObserver`] is provided, it receives one outcome per
//!   import attempt.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::store::EmployeeStore;
use crate::types::Employee;

use super::csv;
use super::normalize::CandidateBatch;
use super::observability::{
    ImportContext, ImportObserver, ImportOutcome, ImportSeverity, ImportStats,
};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportFormat {
    /// Comma-separated values.
    Csv,
    /// Excel workbook, legacy (`.xls`) or zip-based (`.xlsx`).
    Spreadsheet,
}

impl ImportFormat {
    /// Classify a filename by its suffix (case-insensitive). No content sniffing.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let name = filename.to_lowercase();
        if name.ends_with(".csv") {
            Some(Self::Csv)
        } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
            Some(Self::Spreadsheet)
        } else {
            None
        }
    }

    /// Like [`Self::from_filename`], failing with [`ImportError::UnsupportedFormat`] for a
    /// missing or unrecognized filename.
    pub fn detect(filename: Option<&str>) -> ImportResult<Self> {
        filename
            .and_then(Self::from_filename)
            .ok_or_else(|| ImportError::UnsupportedFormat {
                filename: filename.map(str::to_owned),
            })
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Csv => f.write_str("CSV"),
            ImportFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// An uploaded file: its declared name (used only for format detection) and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: Some(filename.into()),
            content: content.into(),
        }
    }

    /// An upload whose client did not send a filename.
    pub fn unnamed(content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: None,
            content: content.into(),
        }
    }
}

/// Options controlling import behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// If `None`, detect the format from the filename.
    pub format: Option<ImportFormat>,
    /// Optional observer for import outcomes.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Failures at or above this severity are flagged as alerts.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Import every valid row of `file` into `store`.
///
/// Returns the persisted records in source order, or an error. Individual malformed rows are
/// dropped and logged; they never fail the import on their own. If no row survives, the import
/// fails with [`ImportError::NoValidRecords`] and the store is not called.
///
/// When an observer is configured it receives [`ImportOutcome::Imported`] with the row counts,
/// or [`ImportOutcome::Failed`] with the error's severity. An unsupported filename fails before
/// the observer is called.
///
/// # Examples
///
/// ```
/// use staff_import::ingestion::{import_employees, ImportOptions, UploadedFile};
/// use staff_import::store::InMemoryEmployeeStore;
///
/// # fn main() -> Result<(), staff_import::ImportError> {
/// let csv = "nome,email,time,mesEntrada,fabrica,senioridade,cargo,modelo\n\
///            Ana,ana@x.com,Core Banking,Março,Interno,Junior,Dev BackEnd,PJ\n";
/// let store = InMemoryEmployeeStore::new();
///
/// let saved = import_employees(
///     &UploadedFile::new("funcionarios.csv", csv),
///     &store,
///     &ImportOptions::default(),
/// )?;
/// assert_eq!(saved.len(), 1);
/// assert_eq!(saved[0].record.cargo, "Dev BackEnd");
/// # Ok(())
/// # }
/// ```
pub fn import_employees(
    file: &UploadedFile,
    store: &dyn EmployeeStore,
    options: &ImportOptions,
) -> ImportResult<Vec<Employee>> {
    let format = match options.format {
        Some(f) => f,
        None => ImportFormat::detect(file.filename.as_deref())?,
    };

    let ctx = ImportContext {
        filename: file.filename.clone(),
        format,
    };

    let result = import_as(format, &file.content, store);

    match result {
        Ok((saved, stats)) => {
            tracing::info!(
                %format,
                imported = stats.imported,
                skipped = stats.skipped,
                "employee import finished"
            );
            if let Some(obs) = options.observer.as_ref() {
                obs.observe(&ctx, &ImportOutcome::Imported(stats));
            }
            Ok(saved)
        }
        Err(e) => {
            report_failure(options, &ctx, &e);
            Err(e)
        }
    }
}

fn report_failure(options: &ImportOptions, ctx: &ImportContext, e: &ImportError) {
    tracing::error!(format = %ctx.format, error = %e, "employee import failed");

    if let Some(obs) = options.observer.as_ref() {
        let severity = e.severity();
        let outcome = ImportOutcome::Failed {
            severity,
            error: e,
            alert: severity >= options.alert_at_or_above,
        };
        obs.observe(ctx, &outcome);
    }
}

fn import_as(
    format: ImportFormat,
    content: &[u8],
    store: &dyn EmployeeStore,
) -> ImportResult<(Vec<Employee>, ImportStats)> {
    let batch = match format {
        ImportFormat::Csv => csv::read_csv_candidates(content)?,
        ImportFormat::Spreadsheet => read_spreadsheet_dispatch(content)?,
    };
    persist(format, batch, store)
}

fn persist(
    format: ImportFormat,
    batch: CandidateBatch,
    store: &dyn EmployeeStore,
) -> ImportResult<(Vec<Employee>, ImportStats)> {
    if batch.records.is_empty() {
        return Err(ImportError::NoValidRecords { format });
    }

    let expected = batch.records.len();
    let saved = store
        .save_all(batch.records)
        .map_err(|e| ImportError::ImportFailure {
            message: e.to_string(),
        })?;
    if saved.len() != expected {
        return Err(ImportError::ImportFailure {
            message: format!("store returned {} records for a batch of {expected}", saved.len()),
        });
    }

    let stats = ImportStats {
        rows_read: batch.rows_read,
        imported: saved.len(),
        skipped: batch.skipped,
    };
    Ok((saved, stats))
}

fn read_spreadsheet_dispatch(content: &[u8]) -> ImportResult<CandidateBatch> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_spreadsheet_candidates(content)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = content;
        Err(ImportError::ReadFailure {
            format: ImportFormat::Spreadsheet,
            source: crate::error::ReadError::Unsupported(
                "spreadsheet import not enabled (enable cargo feature 'excel')".to_string(),
            ),
        })
    }
}

/// Import a file from disk, using its file name for format detection.
pub fn import_from_path(
    path: impl AsRef<Path>,
    store: &dyn EmployeeStore,
    options: &ImportOptions,
) -> ImportResult<Vec<Employee>> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let format = match options.format {
        Some(f) => f,
        None => ImportFormat::detect(filename.as_deref())?,
    };
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            let err = ImportError::read(format, e);
            let ctx = ImportContext { filename, format };
            report_failure(options, &ctx, &err);
            return Err(err);
        }
    };

    let file = UploadedFile { filename, content };
    let options = ImportOptions {
        format: Some(format),
        ..options.clone()
    };
    import_employees(&file, store, &options)
}
