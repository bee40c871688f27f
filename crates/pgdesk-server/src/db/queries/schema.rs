//! Schema introspection queries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::db::models::schema::relkind_label;
use crate::db::models::{ColumnInfo, SizeDetails, TableInfo, TablesBySchema};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Current server time; doubles as a connectivity check.
pub async fn server_time(pool: &DbPool) -> AppResult<DateTime<Utc>> {
    sqlx::query_scalar("SELECT NOW()")
        .fetch_one(pool)
        .await
        .map_err(AppError::database("Failed to connect to the database"))
}

/// List user base tables grouped by schema.
pub async fn list_tables(pool: &DbPool) -> AppResult<TablesBySchema> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT table_schema::text, table_name::text
        FROM information_schema.tables
        WHERE table_type = 'BASE TABLE'
          AND table_schema NOT IN ('pg_catalog', 'information_schema')
        ORDER BY table_schema, table_name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::database("Failed to get tables and schemas"))?;

    Ok(group_tables(rows))
}

/// Group `(schema, table)` pairs, keeping table order within each schema.
pub fn group_tables(rows: Vec<(String, String)>) -> TablesBySchema {
    let mut grouped = TablesBySchema::new();
    for (schema, table) in rows {
        grouped.entry(schema).or_default().push(table);
    }
    grouped
}

/// Columns of `schema.table` in ordinal order.
pub async fn table_structure(
    pool: &DbPool,
    schema: &str,
    table: &str,
) -> AppResult<Vec<ColumnInfo>> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT
            c.column_name::text AS column_name,
            c.data_type::text AS data_type,
            c.is_nullable::text AS is_nullable,
            c.column_default::text AS column_default,
            c.character_maximum_length::int4 AS character_maximum_length,
            EXISTS (
                SELECT 1
                FROM information_schema.table_constraints tc
                JOIN information_schema.key_column_usage kcu
                  ON kcu.constraint_name = tc.constraint_name
                 AND kcu.constraint_schema = tc.constraint_schema
                 AND kcu.table_name = tc.table_name
                WHERE tc.constraint_type = 'PRIMARY KEY'
                  AND tc.table_schema = c.table_schema
                  AND tc.table_name = c.table_name
                  AND kcu.column_name = c.column_name
            ) AS primary_key
        FROM information_schema.columns c
        WHERE c.table_schema = $1
          AND c.table_name = $2
        ORDER BY c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(AppError::database("Failed to get table structure"))
}

/// Kind, row estimate and on-disk sizes of a relation.
pub async fn table_info(pool: &DbPool, schema: &str, table: &str) -> AppResult<TableInfo> {
    let row: Option<(String, i64, i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT
            c.relkind::text,
            GREATEST(c.reltuples, 0)::int8,
            pg_total_relation_size(c.oid)::int8,
            pg_table_size(c.oid)::int8,
            pg_indexes_size(c.oid)::int8
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
          AND c.relname = $2
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_optional(pool)
    .await
    .map_err(AppError::database("Failed to get table info"))?;

    let (relkind, estimated_rows, total_size, table_size, indexes_size) = row
        .ok_or_else(|| AppError::NotFound(format!("Table {}.{} not found", schema, table)))?;

    Ok(TableInfo {
        relation_type: relkind_label(&relkind).to_string(),
        estimated_rows_count: estimated_rows,
        total_size_bytes: total_size,
        size_details: SizeDetails {
            table_size,
            indexes_size,
        },
    })
}

/// Declared type of every live column of `schema.table`, as `format_type`
/// renders it (e.g. `character varying(20)`).
pub async fn column_types(
    pool: &DbPool,
    schema: &str,
    table: &str,
) -> AppResult<HashMap<String, String>> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT a.attname::text, format_type(a.atttypid, a.atttypmod)
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
          AND c.relname = $2
          AND a.attnum > 0
          AND NOT a.attisdropped
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(AppError::database("Failed to read column types"))?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "Table {}.{} not found",
            schema, table
        )));
    }

    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_tables() {
        let rows = vec![
            ("billing".to_string(), "invoices".to_string()),
            ("public".to_string(), "accounts".to_string()),
            ("public".to_string(), "users".to_string()),
        ];
        let grouped = group_tables(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["billing"], vec!["invoices"]);
        assert_eq!(grouped["public"], vec!["accounts", "users"]);

        let json = serde_json::to_string(&grouped).unwrap();
        assert_eq!(
            json,
            r#"{"billing":["invoices"],"public":["accounts","users"]}"#
        );
    }

    #[test]
    fn test_group_tables_empty() {
        assert!(group_tables(Vec::new()).is_empty());
    }
}
