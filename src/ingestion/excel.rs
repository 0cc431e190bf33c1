#![cfg(feature = "excel")]

//! Spreadsheet import (`.xls`, `.xlsx`).
//!
//! Behavior:
//! - Only the first worksheet is read; the workbook kind is detected by `calamine` from content
//! - The first row of that sheet is the header and is discarded
//! - Columns 0..8 of every other row are coerced to text (see [`coerce_cell`]); numbers always
//!   keep a fractional part (`3.0`)
//! - Rows whose eight values are all blank are dropped before normalization

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::{ImportError, ImportResult};
use crate::types::EMPLOYEE_FIELD_COUNT;

use super::normalize::{CandidateBatch, RawRow};
use super::unified::ImportFormat;

/// A single cell as seen by the import, independent of the workbook format.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Numeric(f64),
    Boolean(bool),
    /// A formula cell, carrying the value the spreadsheet stored when it was last saved.
    Formula { cached: Box<Cell> },
    /// No cell at this position, or an empty one.
    Absent,
    /// An error value such as `#DIV/0!`.
    Error(String),
}

/// Convert a cell to the text handed to the normalizer.
///
/// Formula cells use their cached result when it is text or numeric and are empty otherwise.
/// Error cells fail; callers substitute an empty string.
pub fn coerce_cell(cell: &Cell) -> Result<String, String> {
    match cell {
        Cell::Text(s) => Ok(s.clone()),
        Cell::Numeric(n) => Ok(format_number(*n)),
        Cell::Boolean(b) => Ok(b.to_string()),
        Cell::Formula { cached } => match cached.as_ref() {
            Cell::Text(_) | Cell::Numeric(_) => coerce_cell(cached),
            _ => Ok(String::new()),
        },
        Cell::Absent => Ok(String::new()),
        Cell::Error(e) => Err(format!("cell holds error value {e}")),
    }
}

// Always keeps a fractional part: 2024 becomes "2024.0", 98.5 stays "98.5".
fn format_number(n: f64) -> String {
    format!("{n:?}")
}

/// Read the first worksheet of a workbook and normalize its data rows into candidates.
pub fn read_spreadsheet_candidates(bytes: &[u8]) -> ImportResult<CandidateBatch> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::read(ImportFormat::Spreadsheet, e))?;

    let sheet = first_sheet_name(&workbook.sheet_names())?.to_string();
    let values = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::read(ImportFormat::Spreadsheet, e))?;
    let formulas = match workbook.worksheet_formula(&sheet) {
        Ok(range) => Some(range),
        Err(e) => {
            tracing::warn!(sheet = %sheet, error = %e, "formulas unavailable, reading cached values only");
            None
        }
    };

    let mut rows = SpreadsheetRows::new(values, formulas)?;
    let batch = CandidateBatch::collect(rows.by_ref().map(Ok))?;
    Ok(batch.with_filtered(rows.blank_rows()))
}

fn first_sheet_name(names: &[String]) -> ImportResult<&str> {
    names
        .first()
        .map(String::as_str)
        .ok_or(ImportError::EmptySheet)
}

/// Lazy iterator over the data rows of one worksheet.
///
/// Cell positions are absolute, so column 0 is always column `A` even when the sheet's used
/// range starts further right.
pub struct SpreadsheetRows {
    values: Range<Data>,
    formulas: Option<Range<String>>,
    next_row: u32,
    last_row: u32,
    blank_rows: usize,
}

impl SpreadsheetRows {
    /// Position after the header row. Fails with [`ImportError::EmptySheet`] if the sheet has
    /// no rows at all.
    pub fn new(values: Range<Data>, formulas: Option<Range<String>>) -> ImportResult<Self> {
        let (Some((first_row, _)), Some((last_row, _))) = (values.start(), values.end()) else {
            return Err(ImportError::EmptySheet);
        };

        Ok(Self {
            values,
            formulas,
            next_row: first_row + 1,
            last_row,
            blank_rows: 0,
        })
    }

    /// Data rows dropped so far because all eight values were blank.
    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }

    fn cell_at(&self, row: u32, col: u32) -> Cell {
        let cached = match self.values.get_value((row, col)) {
            None | Some(Data::Empty) => Cell::Absent,
            Some(Data::String(s)) => Cell::Text(s.clone()),
            Some(Data::Int(i)) => Cell::Numeric(*i as f64),
            Some(Data::Float(f)) => Cell::Numeric(*f),
            Some(Data::Bool(b)) => Cell::Boolean(*b),
            Some(Data::DateTime(dt)) => Cell::Numeric(dt.as_f64()),
            Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => Cell::Text(s.clone()),
            Some(Data::Error(e)) => Cell::Error(format!("{e:?}")),
        };

        let is_formula = self
            .formulas
            .as_ref()
            .and_then(|f| f.get_value((row, col)))
            .is_some_and(|f| !f.is_empty());
        if is_formula {
            Cell::Formula {
                cached: Box::new(cached),
            }
        } else {
            cached
        }
    }

    fn extract_row(&self, row: u32) -> Vec<String> {
        (0..EMPLOYEE_FIELD_COUNT as u32)
            .map(|col| {
                coerce_cell(&self.cell_at(row, col)).unwrap_or_else(|message| {
                    tracing::warn!(row = row + 1, column = col, %message, "unreadable cell, using empty value");
                    String::new()
                })
            })
            .collect()
    }
}

impl Iterator for SpreadsheetRows {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        while self.next_row <= self.last_row {
            let row = self.next_row;
            self.next_row += 1;

            let fields = self.extract_row(row);
            if fields.iter().all(|v| v.trim().is_empty()) {
                self.blank_rows += 1;
                continue;
            }
            return Some(RawRow {
                line: row as usize + 1,
                fields,
            });
        }
        None
    }
}
