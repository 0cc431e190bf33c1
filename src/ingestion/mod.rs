//! Import entrypoints and implementations.
//!
//! Most callers should use [`import_employees`] (from [`unified`]) which:
//!
//! - detects the upload format by filename suffix (or you can override via [`ImportOptions`])
//! - reads and normalizes rows into [`crate::types::NewEmployee`] candidates
//! - persists the whole batch through an [`crate::store::EmployeeStore`]
//! - optionally reports the outcome to an [`ImportObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - `excel` (requires the `excel` feature)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod normalize;
pub mod observability;
pub mod unified;

pub use normalize::{CandidateBatch, RawRow, normalize_row};
pub use observability::{
    FileObserver, ImportContext, ImportObserver, ImportOutcome, ImportSeverity, ImportStats,
    TracingObserver,
};
pub use unified::{ImportFormat, ImportOptions, UploadedFile, import_employees, import_from_path};
