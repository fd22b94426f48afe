//! Table access for export adapters.
//!
//! Exporters never reach into a concrete table type. They see a [`Table`]:
//! ordered column names plus row-wise access to scalar [`Cell`]s. The trait
//! is implemented for Arrow's `RecordBatch`, which is the table type the
//! importers produce.
//!
//! Export adapters implement [`Exporter`] and are attached to a table
//! explicitly through [`TableExt::export_with`].

use std::fmt;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::error::{Error, Result};

/// A single scalar read out of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Boolean(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part of whole floats ("2.0", not "2").
            Cell::Float(v) if v.is_finite() => write!(f, "{:?}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Str(s) => f.write_str(s),
        }
    }
}

/// Read access to a table with named columns and scalar rows.
pub trait Table {
    /// Column names in order.
    fn column_names(&self) -> Vec<String>;

    /// Number of rows.
    fn num_rows(&self) -> usize;

    /// The cells of row `index`, one per column, in column order.
    fn row(&self, index: usize) -> Result<Vec<Cell>>;
}

impl dyn Table + '_ {
    /// Iterate over all rows in order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
        }
    }
}

/// Iterator over the rows of a [`Table`].
pub struct Rows<'a> {
    table: &'a dyn Table,
    next: usize,
}

impl Iterator for Rows<'_> {
    type Item = Result<Vec<Cell>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.table.num_rows() {
            return None;
        }
        let row = self.table.row(self.next);
        self.next += 1;
        Some(row)
    }
}

impl Table for RecordBatch {
    fn column_names(&self) -> Vec<String> {
        self.schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    fn num_rows(&self) -> usize {
        RecordBatch::num_rows(self)
    }

    fn row(&self, index: usize) -> Result<Vec<Cell>> {
        if index >= RecordBatch::num_rows(self) {
            return Err(Error::InvalidInput(format!(
                "row {} out of range for table with {} rows",
                index,
                RecordBatch::num_rows(self)
            )));
        }

        self.columns()
            .iter()
            .map(|column| array_cell(column.as_ref(), index))
            .collect()
    }
}

/// Read one cell out of an Arrow array.
fn array_cell(array: &dyn Array, index: usize) -> Result<Cell> {
    if array.is_null(index) {
        return Ok(Cell::Null);
    }

    let cell = match array.data_type() {
        DataType::Boolean => Cell::Boolean(array.as_boolean().value(index)),
        DataType::Int64 => Cell::Int(array.as_primitive::<Int64Type>().value(index)),
        DataType::Float64 => Cell::Float(array.as_primitive::<Float64Type>().value(index)),
        DataType::Utf8 => Cell::Str(array.as_string::<i32>().value(index).to_string()),
        DataType::LargeUtf8 => Cell::Str(array.as_string::<i64>().value(index).to_string()),
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array, &options).map_err(|e| {
                Error::InvalidInput(format!(
                    "cannot format column of type {}: {}",
                    array.data_type(),
                    e
                ))
            })?;
            Cell::Str(formatter.value(index).to_string())
        }
    };

    Ok(cell)
}

/// An adapter that writes a table somewhere.
pub trait Exporter {
    /// Write `table` to this exporter's destination.
    fn export(&self, table: &dyn Table) -> Result<()>;
}

/// Extension methods available on every [`Table`].
pub trait TableExt: Table {
    /// Hand this table to an export adapter.
    fn export_with<E: Exporter + ?Sized>(&self, exporter: &E) -> Result<()>
    where
        Self: Sized,
    {
        exporter.export(self)
    }
}

impl<T: Table> TableExt for T {}
