use thiserror::Error;

use crate::ingestion::ImportFormat;
use crate::ingestion::observability::ImportSeverity;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by the import pipeline.
///
/// Row-level problems never show up here: they are [`SkipReason`]s, recovered locally by
/// skipping the row. Every variant of this enum aborts the whole import and nothing is persisted.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The filename is missing or does not end in `.csv`, `.xls` or `.xlsx`.
    #[error("unsupported file format{}: use .csv, .xls or .xlsx", display_filename(.filename))]
    UnsupportedFormat { filename: Option<String> },

    /// The workbook has no worksheets, or its first worksheet has no rows.
    #[error("spreadsheet is empty")]
    EmptySheet,

    /// The upload could not be read or decoded.
    #[error("failed to read {format} file: {source}")]
    ReadFailure {
        format: ImportFormat,
        #[source]
        source: ReadError,
    },

    /// The whole file was scanned and no row produced a record.
    #[error("no valid employee records found in the {}", source_noun(.format))]
    NoValidRecords { format: ImportFormat },

    /// Anything else that aborted the import, including the store rejecting the batch.
    #[error("import failed: {message}")]
    ImportFailure { message: String },
}

impl ImportError {
    pub(crate) fn read(format: ImportFormat, source: impl Into<ReadError>) -> Self {
        Self::ReadFailure {
            format,
            source: source.into(),
        }
    }

    /// Severity used for observer outcomes and alert thresholds. Uploads that are readable but
    /// hold nothing to import are warnings.
    pub fn severity(&self) -> ImportSeverity {
        match self {
            ImportError::ReadFailure { source, .. } if source.is_io() => ImportSeverity::Critical,
            ImportError::UnsupportedFormat { .. }
            | ImportError::EmptySheet
            | ImportError::NoValidRecords { .. } => ImportSeverity::Warning,
            ImportError::ReadFailure { .. } | ImportError::ImportFailure { .. } => {
                ImportSeverity::Error
            }
        }
    }
}

fn source_noun(format: &ImportFormat) -> &'static str {
    match format {
        ImportFormat::Csv => "CSV file",
        ImportFormat::Spreadsheet => "spreadsheet",
    }
}

fn display_filename(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!(" '{name}'"),
        None => " (no filename)".to_string(),
    }
}

/// Underlying cause of an [`ImportError::ReadFailure`].
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Spreadsheet support was compiled out.
    #[error("{0}")]
    Unsupported(String),
}

impl ReadError {
    fn is_io(&self) -> bool {
        match self {
            ReadError::Io(_) => true,
            ReadError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            #[cfg(feature = "excel")]
            ReadError::Excel(err) => matches!(err, calamine::Error::Io(_)),
            ReadError::Unsupported(_) => false,
        }
    }
}

/// Why a single source row did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("insufficient fields: expected {expected}, found {found}")]
    InsufficientFields { expected: usize, found: usize },
}
