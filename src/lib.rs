//! # frame-io
//!
//! Move tables in and out of CSV files and Redis.
//!
//! This crate provides two I/O adapters for Arrow
//! [`RecordBatch`](arrow::array::RecordBatch) tables:
//!
//! | Adapter | Direction | Description |
//! |---------|-----------|-------------|
//! | CSV | Export | Delimited text, optionally gzip-compressed |
//! | CSV | Import | Reads plain or gzip files back, with type coercion |
//! | Redis | Import | JSON values under keys, reshaped by their layout |
//!
//! ## Quick Start
//!
//! ### Writing CSV
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray};
//! use frame_io::{Compression, CsvExportOptions, write_csv};
//!
//! let batch = RecordBatch::try_from_iter(vec![
//!     ("name", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
//!     ("price", Arc::new(Float64Array::from(vec![1.5, 2.25])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! // Plain CSV with a header row
//! write_csv(&batch, "prices.csv", &CsvExportOptions::default()).unwrap();
//!
//! // Gzip, decimal commas, no header
//! let options = CsvExportOptions::new()
//!     .with_compression(Compression::Gzip)
//!     .with_convert_comma(true)
//!     .with_headers(false);
//! write_csv(&batch, "prices.csv.gz", &options).unwrap();
//! ```
//!
//! ### Reading from Redis
//!
//! ```no_run
//! use frame_io::{RedisImporter, RedisStore};
//!
//! let store = RedisStore::new("redis://localhost:6379").unwrap();
//!
//! // Explicit keys; leave them out to read every key in the database
//! let batch = RedisImporter::new(store)
//!     .with_keys(["sales:2023", "sales:2024"])
//!     .load()
//!     .unwrap();
//!
//! println!("Got {} rows", batch.num_rows());
//! ```
//!
//! ### Attaching exporters to tables
//!
//! ```no_run
//! # use arrow::array::RecordBatch;
//! # fn demo(batch: RecordBatch) -> frame_io::Result<()> {
//! use frame_io::{CsvExporter, TableExt};
//!
//! batch.export_with(&CsvExporter::new("out.csv"))?;
//! # Ok(())
//! # }
//! ```

// Module organization:
// - io/       : CSV and Redis adapters
// - (top-level): Shared infrastructure (connection, error, schema, table, conversion)

mod arrow_convert;
mod connection;
mod error;
pub mod io;
mod schema;
mod table;

// Connection
pub use connection::{ConnectionConfig, RedisConnection};

// Error handling
pub use error::{Error, Result};

// Table access
pub use table::{Cell, Exporter, Rows, Table, TableExt};

// Column typing
pub use schema::ColumnType;

// CSV
pub use io::csv::{
    Compression, Converters, CsvExportOptions, CsvExporter, CsvReadOptions, QuoteStyle,
    Terminator, is_gzip, read_csv, write_csv,
};

// Redis
pub use io::redis::{
    JsonEntry, JsonShape, KeyValueStore, MemoryStore, RedisImporter, RedisStore, read_redis,
    read_redis_with_config,
};
