//! Delimited-text export and import.
//!
//! [`write_csv`] serializes any [`Table`](crate::Table) to a CSV file, either
//! through the `csv` encoder or as a gzip stream of comma-joined rows.
//! [`read_csv`] reads such a file back into a RecordBatch.

mod options;
mod reader;
mod writer;

pub use options::{
    Compression, Converters, CsvExportOptions, CsvReadOptions, QuoteStyle, Terminator,
};
pub use reader::{is_gzip, read_csv};
pub use writer::{CsvExporter, write_csv};
