//! Column DDL execution.

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::sql::column::{add_column_sql, drop_column_sql, edit_column_statements};
use crate::sql::ColumnSpec;

pub async fn add_column(pool: &DbPool, schema: &str, table: &str, spec: &ColumnSpec) -> AppResult<()> {
    let sql = add_column_sql(schema, table, spec);
    tracing::debug!(sql = %sql, "Adding column");

    sqlx::raw_sql(&sql)
        .execute(pool)
        .await
        .map_err(AppError::database("Failed to add column"))?;
    Ok(())
}

pub async fn drop_column(pool: &DbPool, schema: &str, table: &str, column: &str) -> AppResult<()> {
    let sql = drop_column_sql(schema, table, column);
    tracing::debug!(sql = %sql, "Dropping column");

    sqlx::raw_sql(&sql)
        .execute(pool)
        .await
        .map_err(AppError::database("Failed to delete column"))?;
    Ok(())
}

/// Apply every change of an edit in one transaction.
///
/// Dropping the transaction on an early return rolls it back.
pub async fn edit_column(
    pool: &DbPool,
    schema: &str,
    table: &str,
    old_name: &str,
    spec: &ColumnSpec,
) -> AppResult<()> {
    let context = "Failed to edit column";
    let mut tx = pool.begin().await.map_err(AppError::database(context))?;

    for statement in edit_column_statements(schema, table, old_name, spec) {
        tracing::debug!(sql = %statement, "Editing column");
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(AppError::database(context))?;
    }

    tx.commit().await.map_err(AppError::database(context))?;
    Ok(())
}
