//! CSV import.
//!
//! Rules:
//!
//! - The first line is a header and is discarded without being looked at. A line ends at
//!   `\n`, `\r\n` or a bare `\r`.
//! - Every other line is split on `,`. There is no quoting or escaping, so a value that itself
//!   contains a comma shifts the remaining values to the right.
//! - Lines with fewer than 8 values are dropped.
//! - Bytes that are not valid UTF-8 are replaced, never rejected.

use std::io::{self, BufRead, BufReader, Read};

use crate::error::{ImportError, ImportResult};
use crate::types::EMPLOYEE_FIELD_COUNT;

use super::normalize::{CandidateBatch, RawRow};
use super::unified::ImportFormat;

/// Read every data row of a CSV upload and normalize it into candidates.
pub fn read_csv_candidates<R: Read>(input: R) -> ImportResult<CandidateBatch> {
    let mut rows = CsvRows::new(BufReader::new(input))?;
    let batch = CandidateBatch::collect(&mut rows)?;
    Ok(batch.with_filtered(rows.short_rows()))
}

/// Lazy iterator over the data rows of a CSV stream.
///
/// Yields rows with at least 8 values; shorter rows are counted and logged at debug level. An
/// I/O error is yielded once as [`ImportError::ReadFailure`] and ends the iteration.
pub struct CsvRows<R: BufRead> {
    records: csv::ByteRecordsIntoIter<R>,
    short_rows: usize,
    failed: bool,
}

impl<R: BufRead> CsvRows<R> {
    /// Consume the header line and prepare to read data lines.
    pub fn new(mut input: R) -> ImportResult<Self> {
        skip_line(&mut input).map_err(|e| ImportError::read(ImportFormat::Csv, e))?;

        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(input)
            .into_byte_records();

        Ok(Self {
            records,
            short_rows: 0,
            failed: false,
        })
    }

    /// Data lines dropped so far for having fewer than 8 values.
    pub fn short_rows(&self) -> usize {
        self.short_rows
    }
}

// Consumes bytes up to and including the first line terminator, using the same terminators
// as the record reader.
fn skip_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|b| matches!(b, b'\n' | b'\r')) {
            Some(i) => {
                let cr = buf[i] == b'\r';
                input.consume(i + 1);
                if cr && input.fill_buf()?.first() == Some(&b'\n') {
                    input.consume(1);
                }
                return Ok(());
            }
            None => {
                let len = buf.len();
                input.consume(len);
            }
        }
    }
}

impl<R: BufRead> Iterator for CsvRows<R> {
    type Item = ImportResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(ImportError::read(ImportFormat::Csv, e)));
                }
            };

            // Positions are relative to the first line after the header.
            let line = record.position().map_or(0, |p| p.line() as usize + 1);

            if record.len() < EMPLOYEE_FIELD_COUNT {
                self.short_rows += 1;
                tracing::debug!(line, fields = record.len(), "dropping short CSV line");
                continue;
            }

            let fields = record
                .iter()
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .collect();
            return Some(Ok(RawRow { line, fields }));
        }
    }
}
