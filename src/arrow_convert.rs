//! Conversion from decoded cells to Arrow arrays.
//!
//! Importers collect their data column by column, either as JSON values
//! (Redis) or as optional text (CSV), and this module turns those columns
//! into a typed Arrow RecordBatch.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, RecordBatch, RecordBatchOptions,
    StringBuilder,
};
use arrow::datatypes::{Field, Schema};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::io::csv::Converters;
use crate::schema::{ColumnType, infer_json_column_type, infer_text_column_type, parse_bool};

/// A named column of JSON cells.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonColumn {
    /// Column name.
    pub name: String,
    /// One cell per row; `Value::Null` for missing values.
    pub values: Vec<Value>,
}

impl JsonColumn {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Convert JSON columns to a RecordBatch with `num_rows` rows.
///
/// Every column must hold exactly `num_rows` values.
pub fn json_columns_to_record_batch(
    columns: &[JsonColumn],
    num_rows: usize,
) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for column in columns {
        let column_type = infer_json_column_type(&column.values);
        fields.push(Field::new(&column.name, column_type.to_arrow_type(), true));
        arrays.push(build_json_column(&column.values, column_type));
    }

    finish_batch(fields, arrays, num_rows)
}

/// Convert CSV text columns to a RecordBatch, typing them per `converters`.
pub fn text_columns_to_record_batch(
    names: &[String],
    columns: &[Vec<Option<String>>],
    num_rows: usize,
    converters: Converters,
) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for (name, values) in names.iter().zip(columns) {
        let column_type = infer_text_column_type(values, converters);
        fields.push(Field::new(name, column_type.to_arrow_type(), true));
        arrays.push(build_text_column(name, values, column_type)?);
    }

    finish_batch(fields, arrays, num_rows)
}

fn finish_batch(fields: Vec<Field>, arrays: Vec<ArrayRef>, num_rows: usize) -> Result<RecordBatch> {
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(|e| Error::Shape(format!("Failed to create RecordBatch: {}", e)))
}

/// Build an Arrow array for a single JSON column.
fn build_json_column(values: &[Value], column_type: ColumnType) -> ArrayRef {
    match column_type {
        ColumnType::Int64 => {
            let mut builder = Int64Builder::with_capacity(values.len());
            for value in values {
                builder.append_option(value.as_i64());
            }
            Arc::new(builder.finish())
        }
        ColumnType::Float64 => {
            let mut builder = Float64Builder::with_capacity(values.len());
            for value in values {
                builder.append_option(value.as_f64());
            }
            Arc::new(builder.finish())
        }
        ColumnType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(values.len());
            for value in values {
                builder.append_option(value.as_bool());
            }
            Arc::new(builder.finish())
        }
        ColumnType::Utf8 => {
            let mut builder = StringBuilder::with_capacity(values.len(), values.len() * 16);
            for value in values {
                match value {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    // Scalars and nested documents keep their JSON text.
                    other => builder.append_value(other.to_string()),
                }
            }
            Arc::new(builder.finish())
        }
    }
}

/// Build an Arrow array for a single text column, parsing values.
fn build_text_column(
    name: &str,
    values: &[Option<String>],
    column_type: ColumnType,
) -> Result<ArrayRef> {
    let array: ArrayRef = match column_type {
        ColumnType::Int64 => {
            let mut builder = Int64Builder::with_capacity(values.len());
            for value in values {
                match value {
                    Some(v) => builder.append_value(v.parse::<i64>().map_err(|e| {
                        Error::Shape(format!(
                            "Failed to parse '{}' as i64 for column '{}': {}",
                            v, name, e
                        ))
                    })?),
                    None => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Float64 => {
            let mut builder = Float64Builder::with_capacity(values.len());
            for value in values {
                match value {
                    Some(v) => builder.append_value(v.parse::<f64>().map_err(|e| {
                        Error::Shape(format!(
                            "Failed to parse '{}' as f64 for column '{}': {}",
                            v, name, e
                        ))
                    })?),
                    None => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(values.len());
            for value in values {
                builder.append_option(value.as_deref().and_then(parse_bool));
            }
            Arc::new(builder.finish())
        }
        ColumnType::Utf8 => {
            let mut builder = StringBuilder::with_capacity(values.len(), values.len() * 16);
            for value in values {
                builder.append_option(value.as_deref());
            }
            Arc::new(builder.finish())
        }
    };

    Ok(array)
}
