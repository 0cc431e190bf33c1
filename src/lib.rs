//! `staff-import` bulk-loads employee records from uploaded tabular files.
//!
//! The primary entrypoint is [`ingestion::import_employees`]: give it the uploaded bytes with their
//! declared filename and an [`store::EmployeeStore`], and it returns the persisted records.
//!
//! ## What you can import
//!
//! **File formats (detected by filename suffix, case-insensitive):**
//!
//! - **CSV**: `.csv`
//! - **Excel workbooks** (Cargo feature `excel`, on by default): `.xls`, `.xlsx`
//!
//! **Layout:** one header row, then one employee per row with exactly these columns in this order
//! (header names are not checked):
//!
//! | # | column        | meaning                 |
//! |---|---------------|-------------------------|
//! | 0 | `nome`        | full name               |
//! | 1 | `email`       | email address           |
//! | 2 | `time`        | team/squad              |
//! | 3 | `mesEntrada`  | entry month (free text) |
//! | 4 | `fabrica`     | sourcing channel        |
//! | 5 | `senioridade` | seniority level         |
//! | 6 | `cargo`       | job title               |
//! | 7 | `modelo`      | engagement model        |
//!
//! Values are trimmed and otherwise kept as-is.
//!
//! ## Row recovery
//!
//! A malformed row (fewer than 8 CSV values, an all-blank spreadsheet row) is logged through
//! `tracing` and dropped; the rest of the file is still imported. An unreadable spreadsheet cell
//! only blanks that value: it is logged and the row is still imported. The import
//! as a whole fails only when the file cannot be read, yields no valid row, or the store rejects
//! the batch. See [`ImportError`].
//!
//! CSV values are split on every `,`: quoted values containing commas are **not** supported.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use staff_import::ingestion::{import_from_path, ImportOptions, TracingObserver};
//! use staff_import::store::InMemoryEmployeeStore;
//!
//! # fn main() -> Result<(), staff_import::ImportError> {
//! let store = InMemoryEmployeeStore::new();
//! let opts = ImportOptions {
//!     observer: Some(Arc::new(TracingObserver)),
//!     ..Default::default()
//! };
//!
//! let saved = import_from_path("funcionarios.xlsx", &store, &opts)?;
//! println!("imported={}", saved.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection, per-format readers, normalization and the batch entrypoint
//! - [`types`]: employee records
//! - [`store`]: the persistence collaborator and an in-memory implementation
//! - [`error`]: error types used across the import

pub mod error;
pub mod ingestion;
pub mod store;
pub mod types;

pub use error::{ImportError, ImportResult, ReadError, SkipReason};
