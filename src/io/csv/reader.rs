//! CSV import, the counterpart of [`write_csv`](super::write_csv).

use std::fs;
use std::io::Read;
use std::path::Path;

use arrow::array::RecordBatch;
use flate2::read::GzDecoder;
use tracing::debug;

use super::options::CsvReadOptions;
use crate::arrow_convert::text_columns_to_record_batch;
use crate::error::Result;

/// Check if data is gzip compressed (magic bytes check).
#[inline]
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Read a CSV file, plain or gzip-compressed, into a RecordBatch.
///
/// Empty cells become nulls. Column types follow `options.converters`.
///
/// Blank lines are skipped. Gzip exports write an all-null row of a
/// single-column table as a blank line, so such rows do not come back.
pub fn read_csv(path: impl AsRef<Path>, options: &CsvReadOptions) -> Result<RecordBatch> {
    let path = path.as_ref();
    let raw = fs::read(path)?;

    let data = if is_gzip(&raw) {
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        decoded
    } else {
        raw
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_reader(data.as_slice());

    let mut records = reader.records();

    let header = if options.headers {
        match records.next() {
            Some(record) => Some(record?),
            None => None,
        }
    } else {
        None
    };

    let mut columns: Vec<Vec<Option<String>>> = Vec::new();
    let mut num_rows = 0;

    for record in records {
        let record = record?;
        if columns.is_empty() {
            columns = vec![Vec::new(); record.len()];
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push((!field.is_empty()).then(|| field.to_string()));
        }
        num_rows += 1;
    }

    let names: Vec<String> = match header {
        Some(header) => header.iter().map(|name| name.to_string()).collect(),
        None => (1..=columns.len()).map(|i| format!("column_{}", i)).collect(),
    };

    // A header with no data rows still names the columns.
    if columns.is_empty() {
        columns = vec![Vec::new(); names.len()];
    }

    debug!(
        path = %path.display(),
        columns = names.len(),
        rows = num_rows,
        "read csv"
    );

    text_columns_to_record_batch(&names, &columns, num_rows, options.converters)
}
