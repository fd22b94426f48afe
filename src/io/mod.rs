//! Table I/O adapters.
//!
//! ## Submodules
//!
//! - [`csv`] - CSV export (plain or gzip) and the matching importer
//! - [`redis`] - Import of JSON values stored in Redis

pub mod csv;
pub mod redis;
