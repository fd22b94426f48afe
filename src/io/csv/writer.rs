//! CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use tracing::debug;

use super::options::{Compression, CsvExportOptions};
use crate::error::Result;
use crate::table::{Exporter, Table};

/// Export adapter that writes a table to a CSV file.
///
/// # Example
/// ```ignore
/// use frame_io::{CsvExporter, CsvExportOptions, TableExt};
///
/// let exporter = CsvExporter::new("out.csv")
///     .with_options(CsvExportOptions::new().with_convert_comma(true));
/// batch.export_with(&exporter)?;
/// ```
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
    options: CsvExportOptions,
}

impl CsvExporter {
    /// Create an exporter writing to `path` with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: CsvExportOptions::default(),
        }
    }

    /// Replace the export options.
    pub fn with_options(mut self, options: CsvExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &CsvExportOptions {
        &self.options
    }
}

impl Exporter for CsvExporter {
    fn export(&self, table: &dyn Table) -> Result<()> {
        write_csv(table, &self.path, &self.options)
    }
}

/// Write `table` to a CSV file at `path`, creating or truncating it.
///
/// The file is not written atomically; on error a partial file may remain.
pub fn write_csv(
    table: &dyn Table,
    path: impl AsRef<Path>,
    options: &CsvExportOptions,
) -> Result<()> {
    let path = path.as_ref();
    let rows = build_rows(table, options)?;

    debug!(
        path = %path.display(),
        rows = rows.len(),
        compression = ?options.compression,
        "writing csv"
    );

    match options.compression {
        Compression::Gzip => write_gzip(path, &rows),
        Compression::None => write_plain(path, &rows, options),
    }
}

/// Build the rows to emit: the optional header row, then one row per table row.
fn build_rows(table: &dyn Table, options: &CsvExportOptions) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(table.num_rows() + 1);

    if options.headers {
        rows.push(table.column_names());
    }

    for row in table.rows() {
        let cells = row?;
        let fields = cells
            .iter()
            .map(|cell| {
                let text = cell.to_string();
                if options.convert_comma {
                    text.replace('.', ",")
                } else {
                    text
                }
            })
            .collect();
        rows.push(fields);
    }

    Ok(rows)
}

/// Gzip output: fields joined with a bare comma, no quoting.
fn write_gzip(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), flate2::Compression::default());

    for row in rows {
        encoder.write_all(row.join(",").as_bytes())?;
        encoder.write_all(b"\n")?;
    }

    encoder.finish()?.flush()?;
    Ok(())
}

fn write_plain(path: &Path, rows: &[Vec<String>], options: &CsvExportOptions) -> Result<()> {
    let mut writer = options.writer_builder().from_path(path)?;

    for row in rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}
