//! Outcome reporting for whole imports.
//!
//! Row-level diagnostics go straight to `tracing`. This module covers the coarser signal: one
//! [`ImportOutcome`] per import attempt, delivered to an [`ImportObserver`].

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImportError;

use super::unified::ImportFormat;

/// How bad a failed import is. Ordered, so it can be compared against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// The upload was readable but had nothing to import.
    Warning,
    /// The upload or the store rejected the import.
    Error,
    /// The upload could not be read at all.
    Critical,
}

impl ImportSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportSeverity::Warning => "warning",
            ImportSeverity::Error => "error",
            ImportSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for ImportSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The upload an outcome belongs to.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub filename: Option<String>,
    pub format: ImportFormat,
}

impl ImportContext {
    fn filename_or_dash(&self) -> &str {
        self.filename.as_deref().unwrap_or("-")
    }
}

/// Row counts of a persisted import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows read from the source, header excluded.
    pub rows_read: usize,
    /// Records persisted.
    pub imported: usize,
    /// Rows dropped (too few fields, or blank).
    pub skipped: usize,
}

impl ImportStats {
    /// Whether some rows of the file did not make it into the store.
    pub fn is_partial(&self) -> bool {
        self.skipped > 0
    }
}

/// Result of one import attempt, as seen by observers.
#[derive(Debug, Clone, Copy)]
pub enum ImportOutcome<'a> {
    /// The batch was persisted.
    Imported(ImportStats),
    /// The import aborted and nothing was persisted. `alert` is set when `severity` reached
    /// [`super::ImportOptions::alert_at_or_above`].
    Failed {
        severity: ImportSeverity,
        error: &'a ImportError,
        alert: bool,
    },
}

/// Receives one outcome per import attempt that got past format detection.
pub trait ImportObserver: Send + Sync {
    fn observe(&self, ctx: &ImportContext, outcome: &ImportOutcome<'_>);
}

/// Fan-out: every observer in the list sees every outcome, in order.
impl ImportObserver for Vec<Arc<dyn ImportObserver>> {
    fn observe(&self, ctx: &ImportContext, outcome: &ImportOutcome<'_>) {
        for observer in self {
            observer.observe(ctx, outcome);
        }
    }
}

/// Emits outcomes as `tracing` events under the `staff_import::outcome` target.
///
/// Clean imports log at `info`, imports that dropped rows at `warn`, failures at `warn` and
/// alerting failures at `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn observe(&self, ctx: &ImportContext, outcome: &ImportOutcome<'_>) {
        let filename = ctx.filename_or_dash();
        match *outcome {
            ImportOutcome::Imported(stats) if stats.is_partial() => tracing::warn!(
                target: "staff_import::outcome",
                format = %ctx.format,
                filename,
                rows_read = stats.rows_read,
                imported = stats.imported,
                skipped = stats.skipped,
                "import succeeded with skipped rows"
            ),
            ImportOutcome::Imported(stats) => tracing::info!(
                target: "staff_import::outcome",
                format = %ctx.format,
                filename,
                imported = stats.imported,
                "import succeeded"
            ),
            ImportOutcome::Failed {
                severity,
                error,
                alert: true,
            } => tracing::error!(
                target: "staff_import::outcome",
                format = %ctx.format,
                filename,
                %severity,
                %error,
                "import alert"
            ),
            ImportOutcome::Failed { severity, error, .. } => tracing::warn!(
                target: "staff_import::outcome",
                format = %ctx.format,
                filename,
                %severity,
                %error,
                "import failed"
            ),
        }
    }
}

/// Appends one line per outcome to a log file, for example:
///
/// ```text
/// 1760600000 imported format=CSV file=funcionarios.csv read=3 imported=2 skipped=1
/// 1760600042 failed severity=critical alert=true format=CSV file=equipe.csv err=...
/// ```
#[derive(Debug)]
pub struct FileObserver {
    file: Mutex<File>,
}

impl FileObserver {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ImportObserver for FileObserver {
    fn observe(&self, ctx: &ImportContext, outcome: &ImportOutcome<'_>) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let line = match outcome {
            ImportOutcome::Imported(stats) => format!(
                "{ts} imported format={} file={} read={} imported={} skipped={}",
                ctx.format,
                ctx.filename_or_dash(),
                stats.rows_read,
                stats.imported,
                stats.skipped
            ),
            ImportOutcome::Failed {
                severity,
                error,
                alert,
            } => format!(
                "{ts} failed severity={severity} alert={alert} format={} file={} err={error}",
                ctx.format,
                ctx.filename_or_dash()
            ),
        };

        let written = match self.file.lock() {
            Ok(mut file) => writeln!(file, "{line}"),
            Err(_) => Err(io::Error::other("log file lock poisoned")),
        };
        if let Err(e) = written {
            tracing::warn!(error = %e, "could not append import outcome to log file");
        }
    }
}
