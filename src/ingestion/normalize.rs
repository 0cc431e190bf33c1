//! Positional row → record mapping, and the per-import batch of candidates.

use crate::error::{ImportResult, SkipReason};
use crate::types::{EMPLOYEE_FIELD_COUNT, NewEmployee};

/// One data row as extracted by a format reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line (CSV) or row (spreadsheet) number in the source, header included.
    pub line: usize,
    pub fields: Vec<String>,
}

/// Candidates collected from one upload, before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBatch {
    /// Normalized records in source order.
    pub records: Vec<NewEmployee>,
    /// Data rows seen, header excluded.
    pub rows_read: usize,
    /// Rows that did not become a record.
    pub skipped: usize,
}

impl CandidateBatch {
    /// Drain `rows`, normalizing each one.
    ///
    /// A row the normalizer rejects is logged and counted, and the scan continues. The first
    /// `Err` from `rows` aborts the scan.
    pub fn collect<I>(rows: I) -> ImportResult<Self>
    where
        I: IntoIterator<Item = ImportResult<RawRow>>,
    {
        let mut batch = Self::default();
        for row in rows {
            let row = row?;
            batch.rows_read += 1;
            match normalize_row(&row.fields) {
                Ok(record) => batch.records.push(record),
                Err(reason) => {
                    batch.skipped += 1;
                    tracing::warn!(line = row.line, %reason, "skipping row");
                }
            }
        }
        Ok(batch)
    }

    /// Account for rows a reader dropped before they reached the normalizer.
    pub(crate) fn with_filtered(mut self, filtered: usize) -> Self {
        self.rows_read += filtered;
        self.skipped += filtered;
        self
    }
}

/// Build a candidate record from the first eight values of `fields`.
///
/// Values are taken in [`crate::types::EMPLOYEE_COLUMNS`] order and trimmed; nothing else is
/// checked. Extra trailing values are ignored.
pub fn normalize_row<S: AsRef<str>>(fields: &[S]) -> Result<NewEmployee, SkipReason> {
    if fields.len() < EMPLOYEE_FIELD_COUNT {
        return Err(SkipReason::InsufficientFields {
            expected: EMPLOYEE_FIELD_COUNT,
            found: fields.len(),
        });
    }

    let field = |idx: usize| fields[idx].as_ref().trim().to_owned();
    Ok(NewEmployee {
        nome: field(0),
        email: field(1),
        time: field(2),
        mes_entrada: field(3),
        fabrica: field(4),
        senioridade: field(5),
        cargo: field(6),
        modelo: field(7),
    })
}
