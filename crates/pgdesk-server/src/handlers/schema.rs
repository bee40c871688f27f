//! Schema introspection handlers.

use axum::extract::State;

use crate::db::models::{ColumnInfo, TableInfo, TablesBySchema};
use crate::db::queries::schema;
use crate::db::ConnectionTarget;
use crate::error::AppError;
use crate::extract::Json;
use crate::handlers::TableRequest;
use crate::state::AppState;

/// List base tables grouped by schema.
///
/// POST /api/getTablesAndSchemas
pub async fn get_tables_and_schemas(
    State(state): State<AppState>,
    Json(target): Json<ConnectionTarget>,
) -> Result<Json<TablesBySchema>, AppError> {
    let tables = state
        .with_database(&target, |pool| async move { schema::list_tables(&pool).await })
        .await?;
    Ok(Json(tables))
}

/// Columns of one table.
///
/// POST /api/getTableStructure
pub async fn get_table_structure(
    State(state): State<AppState>,
    Json(request): Json<TableRequest>,
) -> Result<Json<Vec<ColumnInfo>>, AppError> {
    let (schema_name, table) = request.validate()?;
    let columns = state
        .with_database(&request.target, |pool| async move {
            schema::table_structure(&pool, schema_name, table).await
        })
        .await?;
    Ok(Json(columns))
}

/// Kind, row estimate and sizes of one table.
///
/// POST /api/getTableInfo
pub async fn get_table_info(
    State(state): State<AppState>,
    Json(request): Json<TableRequest>,
) -> Result<Json<TableInfo>, AppError> {
    let (schema_name, table) = request.validate()?;
    let info = state
        .with_database(&request.target, |pool| async move {
            schema::table_info(&pool, schema_name, table).await
        })
        .await?;
    Ok(Json(info))
}
