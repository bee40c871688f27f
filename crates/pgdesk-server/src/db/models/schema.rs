//! Introspection models.
//!
//! Field names follow what the UI reads: column rows keep the
//! `information_schema` snake_case names, table info is camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Base tables grouped by schema, both in name order.
pub type TablesBySchema = BTreeMap<String, Vec<String>>;

/// One column of a table, as shown by the structure editor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,

    /// `information_schema` type name (e.g. "character varying")
    pub data_type: String,

    /// "YES" or "NO"
    pub is_nullable: String,

    #[sqlx(default)]
    pub column_default: Option<String>,

    #[sqlx(default)]
    pub character_maximum_length: Option<i32>,

    /// Part of the table's primary key
    pub primary_key: bool,
}

/// Storage statistics of a relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    /// Relation kind ("table", "view", ...)
    #[serde(rename = "type")]
    pub relation_type: String,

    /// Planner estimate from `pg_class.reltuples`
    pub estimated_rows_count: i64,

    /// Table, indexes and TOAST together
    pub total_size_bytes: i64,

    pub size_details: SizeDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeDetails {
    pub table_size: i64,
    pub indexes_size: i64,
}

/// Human name of a `pg_class.relkind` code.
pub fn relkind_label(relkind: &str) -> &'static str {
    match relkind {
        "r" => "table",
        "v" => "view",
        "m" => "materialized view",
        "p" => "partitioned table",
        "f" => "foreign table",
        "S" => "sequence",
        "i" => "index",
        "I" => "partitioned index",
        "c" => "composite type",
        "t" => "TOAST table",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_info_serialization() {
        let info = TableInfo {
            relation_type: relkind_label("r").to_string(),
            estimated_rows_count: 1200,
            total_size_bytes: 65536,
            size_details: SizeDetails {
                table_size: 49152,
                indexes_size: 16384,
            },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "table");
        assert_eq!(json["estimatedRowsCount"], 1200);
        assert_eq!(json["totalSizeBytes"], 65536);
        assert_eq!(json["sizeDetails"]["tableSize"], 49152);
        assert_eq!(json["sizeDetails"]["indexesSize"], 16384);
    }

    #[test]
    fn test_relkind_labels() {
        assert_eq!(relkind_label("m"), "materialized view");
        assert_eq!(relkind_label("p"), "partitioned table");
        assert_eq!(relkind_label("?"), "unknown");
    }

    #[test]
    fn test_column_info_keeps_snake_case() {
        let column = ColumnInfo {
            column_name: "id".into(),
            data_type: "integer".into(),
            is_nullable: "NO".into(),
            column_default: Some("nextval('users_id_seq'::regclass)".into()),
            character_maximum_length: None,
            primary_key: true,
        };
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["column_name"], "id");
        assert_eq!(json["primary_key"], true);
        assert!(json["character_maximum_length"].is_null());
    }
}
