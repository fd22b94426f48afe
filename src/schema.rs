//! Column types for imported tables.
//!
//! Neither JSON documents in Redis nor CSV text carry a schema, so each
//! column's Arrow type is inferred from the values it holds.

use arrow::datatypes::DataType;
use serde_json::Value;

use crate::io::csv::Converters;

/// Supported column types for imported data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 string.
    Utf8,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Boolean.
    Boolean,
}

impl ColumnType {
    /// Convert to Arrow DataType.
    pub fn to_arrow_type(&self) -> DataType {
        match self {
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Boolean => DataType::Boolean,
        }
    }
}

/// Infer a column type from JSON cells. Nulls are ignored.
///
/// Integers widen to Float64 when mixed with non-integral numbers; any
/// other mix falls back to Utf8.
pub fn infer_json_column_type(values: &[Value]) -> ColumnType {
    let non_null: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    if non_null.is_empty() {
        return ColumnType::Utf8;
    }

    if non_null.iter().all(|v| v.is_i64()) {
        return ColumnType::Int64;
    }

    if non_null.iter().all(|v| v.is_number()) {
        return ColumnType::Float64;
    }

    if non_null.iter().all(|v| v.is_boolean()) {
        return ColumnType::Boolean;
    }

    ColumnType::Utf8
}

/// Infer a column type from CSV text cells under the given converters.
///
/// Empty cells count as null and do not influence the result. `Numeric`
/// also recognizes `true`/`false` columns, which is how boolean columns
/// are written.
pub fn infer_text_column_type(values: &[Option<String>], converters: Converters) -> ColumnType {
    let non_null: Vec<&str> = values.iter().filter_map(|v| v.as_deref()).collect();

    if non_null.is_empty() {
        return ColumnType::Utf8;
    }

    let all_int = || non_null.iter().all(|v| v.parse::<i64>().is_ok());
    let all_float = || non_null.iter().all(|v| v.parse::<f64>().is_ok());
    let all_bool = || non_null.iter().all(|v| parse_bool(v).is_some());

    match converters {
        Converters::None => ColumnType::Utf8,
        Converters::Integer if all_int() => ColumnType::Int64,
        Converters::Float if all_float() => ColumnType::Float64,
        Converters::Numeric if all_int() => ColumnType::Int64,
        Converters::Numeric if all_float() => ColumnType::Float64,
        Converters::Numeric if all_bool() => ColumnType::Boolean,
        _ => ColumnType::Utf8,
    }
}

/// Parse a string as a boolean, ignoring case.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn text(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(|s| s.to_string())).collect()
    }

    #[test]
    fn test_column_type_to_arrow() {
        assert_eq!(ColumnType::Utf8.to_arrow_type(), DataType::Utf8);
        assert_eq!(ColumnType::Int64.to_arrow_type(), DataType::Int64);
        assert_eq!(ColumnType::Float64.to_arrow_type(), DataType::Float64);
        assert_eq!(ColumnType::Boolean.to_arrow_type(), DataType::Boolean);
    }

    #[test]
    fn test_infer_json_int() {
        let values = vec![json!(1), Value::Null, json!(-4)];
        assert_eq!(infer_json_column_type(&values), ColumnType::Int64);
    }

    #[test]
    fn test_infer_json_mixed_numbers() {
        let values = vec![json!(1), json!(2.5)];
        assert_eq!(infer_json_column_type(&values), ColumnType::Float64);
    }

    #[test]
    fn test_infer_json_bool() {
        let values = vec![json!(true), json!(false)];
        assert_eq!(infer_json_column_type(&values), ColumnType::Boolean);
    }

    #[test]
    fn test_infer_json_mixed_falls_back_to_utf8() {
        let values = vec![json!(1), json!("one")];
        assert_eq!(infer_json_column_type(&values), ColumnType::Utf8);
        let nested = vec![json!([1, 2])];
        assert_eq!(infer_json_column_type(&nested), ColumnType::Utf8);
    }

    #[test]
    fn test_infer_json_all_null() {
        assert_eq!(infer_json_column_type(&[Value::Null, Value::Null]), ColumnType::Utf8);
        assert_eq!(infer_json_column_type(&[]), ColumnType::Utf8);
    }

    #[test]
    fn test_infer_text_numeric() {
        let ints = text(&[Some("1"), None, Some("3")]);
        assert_eq!(infer_text_column_type(&ints, Converters::Numeric), ColumnType::Int64);

        let floats = text(&[Some("1"), Some("2.5")]);
        assert_eq!(infer_text_column_type(&floats, Converters::Numeric), ColumnType::Float64);

        let words = text(&[Some("1"), Some("x")]);
        assert_eq!(infer_text_column_type(&words, Converters::Numeric), ColumnType::Utf8);
    }

    #[test]
    fn test_infer_text_boolean() {
        let flags = text(&[Some("true"), None, Some("FALSE")]);
        assert_eq!(infer_text_column_type(&flags, Converters::Numeric), ColumnType::Boolean);
        assert_eq!(infer_text_column_type(&flags, Converters::Integer), ColumnType::Utf8);
        assert_eq!(infer_text_column_type(&flags, Converters::None), ColumnType::Utf8);

        let mixed = text(&[Some("true"), Some("yes")]);
        assert_eq!(infer_text_column_type(&mixed, Converters::Numeric), ColumnType::Utf8);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn test_infer_text_integer_only() {
        let floats = text(&[Some("1.5")]);
        assert_eq!(infer_text_column_type(&floats, Converters::Integer), ColumnType::Utf8);
        let ints = text(&[Some("15")]);
        assert_eq!(infer_text_column_type(&ints, Converters::Integer), ColumnType::Int64);
    }

    #[test]
    fn test_infer_text_float_only() {
        let ints = text(&[Some("15")]);
        assert_eq!(infer_text_column_type(&ints, Converters::Float), ColumnType::Float64);
    }

    #[test]
    fn test_infer_text_none_converter() {
        let ints = text(&[Some("15")]);
        assert_eq!(infer_text_column_type(&ints, Converters::None), ColumnType::Utf8);
    }
}
