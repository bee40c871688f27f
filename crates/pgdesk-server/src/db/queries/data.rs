//! Row browsing and single-row edits.

use serde_json::{Map, Value};

use crate::db::queries::schema::column_types;
use crate::db::rows::row_to_json;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::sql::{qualified, quote_ident};

/// Paging and ordering for table browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOptions {
    pub limit: u32,
    pub offset: u64,
    pub order_by: Option<String>,
    pub descending: bool,
}

pub fn select_rows_sql(schema: &str, table: &str, options: &BrowseOptions) -> String {
    let mut sql = format!("SELECT * FROM {}", qualified(schema, table));
    if let Some(column) = &options.order_by {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_ident(column),
            if options.descending { "DESC" } else { "ASC" }
        ));
    }
    sql.push_str(&format!(" LIMIT {} OFFSET {}", options.limit, options.offset));
    sql
}

/// Fetch one page of `schema.table`.
pub async fn fetch_rows(
    pool: &DbPool,
    schema: &str,
    table: &str,
    options: &BrowseOptions,
) -> AppResult<Vec<Map<String, Value>>> {
    let sql = select_rows_sql(schema, table, options);

    let rows = sqlx::raw_sql(&sql)
        .fetch_all(pool)
        .await
        .map_err(AppError::database("Failed to get table values"))?;

    Ok(rows.iter().map(row_to_json).collect())
}

/// Text form of a JSON value for binding; `null` binds SQL `NULL`.
pub fn bind_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `UPDATE` with one text parameter per assignment, each cast to the
/// column's declared type, followed by the key parameter.
///
/// `assignments` and `key` are `(column, type)` pairs.
pub fn update_row_sql(
    schema: &str,
    table: &str,
    assignments: &[(&str, &str)],
    key: (&str, &str),
) -> String {
    let set_list = assignments
        .iter()
        .enumerate()
        .map(|(idx, (column, ty))| format!("{} = CAST(${} AS {})", quote_ident(column), idx + 1, ty))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE {} SET {} WHERE {} = CAST(${} AS {})",
        qualified(schema, table),
        set_list,
        quote_ident(key.0),
        assignments.len() + 1,
        key.1
    )
}

pub fn delete_row_sql(schema: &str, table: &str, key: (&str, &str)) -> String {
    format!(
        "DELETE FROM {} WHERE {} = CAST($1 AS {})",
        qualified(schema, table),
        quote_ident(key.0),
        key.1
    )
}

fn type_of<'a>(
    types: &'a std::collections::HashMap<String, String>,
    column: &str,
) -> AppResult<&'a str> {
    types
        .get(column)
        .map(String::as_str)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown column: {}", column)))
}

/// Update the row whose `key_column` equals `key_value`. Returns the number
/// of rows changed.
pub async fn update_row(
    pool: &DbPool,
    schema: &str,
    table: &str,
    key_column: &str,
    key_value: &Value,
    updates: &Map<String, Value>,
) -> AppResult<u64> {
    if updates.is_empty() {
        return Err(AppError::BadRequest("updates must not be empty".to_string()));
    }

    let types = column_types(pool, schema, table).await?;
    let assignments = updates
        .keys()
        .map(|column| -> AppResult<(&str, &str)> { Ok((column.as_str(), type_of(&types, column)?)) })
        .collect::<AppResult<Vec<_>>>()?;
    let key = (key_column, type_of(&types, key_column)?);

    let sql = update_row_sql(schema, table, &assignments, key);
    let mut query = sqlx::query(&sql);
    for value in updates.values() {
        query = query.bind(bind_text(value));
    }
    query = query.bind(bind_text(key_value));

    let result = query
        .execute(pool)
        .await
        .map_err(AppError::database("Failed to update row"))?;
    Ok(result.rows_affected())
}

/// Delete the row whose `key_column` equals `key_value`. Returns the number
/// of rows removed.
pub async fn delete_row(
    pool: &DbPool,
    schema: &str,
    table: &str,
    key_column: &str,
    key_value: &Value,
) -> AppResult<u64> {
    let types = column_types(pool, schema, table).await?;
    let sql = delete_row_sql(schema, table, (key_column, type_of(&types, key_column)?));

    let result = sqlx::query(&sql)
        .bind(bind_text(key_value))
        .execute(pool)
        .await
        .map_err(AppError::database("Failed to delete row"))?;
    Ok(result.rows_affected())
}
