//! Conversion of result rows to JSON.
//!
//! Rows are fetched with the simple query protocol, so every value arrives in
//! PostgreSQL's text format. Each value is read as text and then converted by
//! column type; types without a natural JSON form keep the server rendering.

use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Convert one text-format value to JSON according to its column type name.
pub fn text_to_json(type_name: &str, text: Option<&str>) -> Value {
    let Some(text) = text else {
        return Value::Null;
    };

    match type_name {
        "INT2" | "INT4" | "INT8" | "OID" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        "FLOAT4" | "FLOAT8" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),
        "BOOL" => match text {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        },
        "JSON" | "JSONB" => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => Value::String(text.to_string()),
    }
}

/// Column names of a row, in select-list order.
pub fn field_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Convert a text-format row to a JSON object keyed by column name.
pub fn row_to_json(row: &PgRow) -> Map<String, Value> {
    let mut obj = Map::new();

    for (idx, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = match row.try_get_unchecked::<Option<String>, _>(idx) {
            Ok(text) => text_to_json(type_name, text.as_deref()),
            Err(e) => {
                tracing::warn!(
                    column = %column.name(),
                    type_name = %type_name,
                    error = %e,
                    "Could not read column as text"
                );
                Value::Null
            }
        };
        obj.insert(column.name().to_string(), value);
    }

    obj
}
