//! Shape detection and reshaping for JSON values read from Redis.
//!
//! Values are decoded once, the first one is classified into a
//! [`JsonShape`], and every value is then arranged into table columns by
//! that shape's rule. Later values are not classified on their own: one
//! that does not fit the first key's shape fails with [`Error::Shape`].

use std::collections::HashSet;
use std::fmt;

use arrow::array::RecordBatch;
use serde_json::{Map, Value};

use crate::arrow_convert::{JsonColumn, json_columns_to_record_batch};
use crate::error::{Error, Result, describe_json};

/// A decoded JSON value and the key it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonEntry {
    /// The Redis key.
    pub key: String,
    /// The decoded value.
    pub value: Value,
}

impl JsonEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Layout of the JSON stored under each key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// `[{"x": 1}, {"x": 2}]`: several records per key.
    Records,
    /// `[1, 2, 3]`: one column per key, labelled by the key.
    Columns,
    /// `{"x": [1, 2], "y": [3, 4]}`: column data per key.
    ColumnMap,
    /// `{"x": 1, "y": 2}`: one record per key, labelled by the key.
    Record,
}

impl JsonShape {
    /// Classify a decoded value.
    ///
    /// Only arrays and objects describe a table; anything else is a shape error.
    pub fn classify(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => match items.first() {
                Some(Value::Object(_)) => Ok(JsonShape::Records),
                _ => Ok(JsonShape::Columns),
            },
            Value::Object(map) if !map.is_empty() && map.values().all(Value::is_array) => {
                Ok(JsonShape::ColumnMap)
            }
            Value::Object(_) => Ok(JsonShape::Record),
            other => Err(Error::Shape(format!(
                "cannot build a table from {}; expected an array or an object",
                describe_json(other)
            ))),
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonShape::Records => "records",
            JsonShape::Columns => "columns",
            JsonShape::ColumnMap => "column map",
            JsonShape::Record => "record",
        };
        f.write_str(name)
    }
}

/// Where the key names go for [`JsonShape::Record`] tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyColumn<'a> {
    pub include: bool,
    pub name: &'a str,
}

/// Arrange entries into a RecordBatch according to `shape`.
pub(crate) fn reshape(
    shape: JsonShape,
    entries: &[JsonEntry],
    key_column: &KeyColumn<'_>,
) -> Result<RecordBatch> {
    let (columns, num_rows) = match shape {
        JsonShape::Records => records_columns(entries)?,
        JsonShape::Columns => columns_columns(entries)?,
        JsonShape::ColumnMap => column_map_columns(entries)?,
        JsonShape::Record => record_columns(entries, key_column)?,
    };

    json_columns_to_record_batch(&columns, num_rows)
}

/// Flatten every value into records; one row per record.
fn records_columns(entries: &[JsonEntry]) -> Result<(Vec<JsonColumn>, usize)> {
    let mut records = Vec::new();
    for entry in entries {
        collect_records(&entry.key, &entry.value, &mut records)?;
    }

    let columns = records_to_columns(&records);
    Ok((columns, records.len()))
}

fn collect_records<'a>(
    key: &str,
    value: &'a Value,
    out: &mut Vec<&'a Map<String, Value>>,
) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_records(key, item, out)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            out.push(map);
            Ok(())
        }
        other => Err(Error::unexpected_shape(key, "an array of objects", other)),
    }
}

/// Each value is one column named by its key; rows are the transpose.
fn columns_columns(entries: &[JsonEntry]) -> Result<(Vec<JsonColumn>, usize)> {
    let mut columns = Vec::with_capacity(entries.len());
    let mut num_rows = None;

    for entry in entries {
        let Value::Array(items) = &entry.value else {
            return Err(Error::unexpected_shape(&entry.key, "an array", &entry.value));
        };

        match num_rows {
            None => num_rows = Some(items.len()),
            Some(n) if n != items.len() => {
                return Err(Error::Shape(format!(
                    "key '{}' holds {} values but '{}' holds {}; columns must have equal length",
                    entry.key,
                    items.len(),
                    entries[0].key,
                    n
                )));
            }
            Some(_) => {}
        }

        columns.push(JsonColumn::new(entry.key.clone(), items.clone()));
    }

    Ok((columns, num_rows.unwrap_or(0)))
}

/// Each value maps field names to column data; values are stacked in key order.
fn column_map_columns(entries: &[JsonEntry]) -> Result<(Vec<JsonColumn>, usize)> {
    let mut maps = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Object(map) = &entry.value else {
            return Err(Error::unexpected_shape(
                &entry.key,
                "an object of arrays",
                &entry.value,
            ));
        };
        maps.push((entry.key.as_str(), map));
    }

    let names = union_field_names(maps.iter().map(|(_, map)| *map));
    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    let mut num_rows = 0;

    for (key, map) in maps {
        let mut len = None;
        for (field, value) in map {
            let Value::Array(items) = value else {
                return Err(Error::Shape(format!(
                    "key '{}': field '{}' should be an array, found {}",
                    key,
                    field,
                    describe_json(value)
                )));
            };
            match len {
                None => len = Some(items.len()),
                Some(n) if n != items.len() => {
                    return Err(Error::Shape(format!(
                        "key '{}': field '{}' holds {} values, expected {}",
                        key,
                        field,
                        items.len(),
                        n
                    )));
                }
                Some(_) => {}
            }
        }
        let len = len.unwrap_or(0);

        for (name, column) in names.iter().zip(values.iter_mut()) {
            match map.get(name) {
                Some(Value::Array(items)) => column.extend(items.iter().cloned()),
                _ => column.extend(std::iter::repeat_n(Value::Null, len)),
            }
        }
        num_rows += len;
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| JsonColumn::new(name, values))
        .collect();

    Ok((columns, num_rows))
}

/// Each value is one record; rows are labelled by key.
fn record_columns(
    entries: &[JsonEntry],
    key_column: &KeyColumn<'_>,
) -> Result<(Vec<JsonColumn>, usize)> {
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Object(map) = &entry.value else {
            return Err(Error::unexpected_shape(&entry.key, "an object", &entry.value));
        };
        records.push(map);
    }

    let mut columns = records_to_columns(&records);

    if key_column.include {
        if columns.iter().any(|c| c.name == key_column.name) {
            return Err(Error::Shape(format!(
                "key column '{}' collides with a field of the same name; \
                 choose another name with with_key_column_name()",
                key_column.name
            )));
        }
        let keys = entries
            .iter()
            .map(|entry| Value::String(entry.key.clone()))
            .collect();
        columns.insert(0, JsonColumn::new(key_column.name, keys));
    }

    Ok((columns, records.len()))
}

/// One column per distinct field, in order of first appearance.
fn records_to_columns(records: &[&Map<String, Value>]) -> Vec<JsonColumn> {
    union_field_names(records.iter().copied())
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|record| record.get(&name).cloned().unwrap_or(Value::Null))
                .collect();
            JsonColumn::new(name, values)
        })
        .collect()
}

fn union_field_names<'a>(maps: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen: HashSet<&'a str> = HashSet::new();

    for map in maps {
        for field in map.keys() {
            if seen.insert(field.as_str()) {
                names.push(field.clone());
            }
        }
    }

    names
}
