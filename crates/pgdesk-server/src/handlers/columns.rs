//! Structure editor handlers: add, edit and delete columns.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::queries::columns;
use crate::de;
use crate::error::{require, AppError, AppResult};
use crate::extract::Json;
use crate::handlers::TableRequest;
use crate::sql::{ColumnSpec, ColumnType};
use crate::state::AppState;

/// Column definition fields as posted by the structure editor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFields {
    #[serde(default, rename = "type")]
    pub column_type: Option<String>,

    #[serde(default, deserialize_with = "de::opt_text")]
    pub default_value: Option<String>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub max_length: Option<u32>,

    #[serde(default)]
    pub allow_null: bool,
}

impl ColumnFields {
    fn spec(&self, name: &str) -> AppResult<ColumnSpec> {
        let column_type = ColumnType::parse(require(&self.column_type, "type")?, self.max_length)?;
        Ok(ColumnSpec {
            name: name.to_string(),
            column_type,
            default: self.default_value.clone(),
            allow_null: self.allow_null,
        })
    }
}

/// Request to add a column.
#[derive(Debug, Clone, Deserialize)]
pub struct AddColumnRequest {
    #[serde(flatten)]
    pub table: TableRequest,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub fields: ColumnFields,
}

/// Request to change an existing column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditColumnRequest {
    #[serde(flatten)]
    pub table: TableRequest,

    #[serde(default)]
    pub old_name: Option<String>,

    #[serde(default)]
    pub new_name: Option<String>,

    #[serde(flatten)]
    pub fields: ColumnFields,
}

/// Request to drop a column.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteColumnRequest {
    #[serde(flatten)]
    pub table: TableRequest,

    #[serde(default)]
    pub column: Option<String>,
}

/// Response for column operations.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Add a column.
///
/// POST /api/addColumn
pub async fn add_column(
    State(state): State<AppState>,
    Json(request): Json<AddColumnRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (schema, table) = request.table.validate()?;
    let name = require(&request.name, "name")?;
    let spec = request.fields.spec(name)?;

    state
        .with_database(&request.table.target, |pool| async move {
            columns::add_column(&pool, schema, table, &spec).await
        })
        .await?;

    tracing::info!(schema = %schema, table = %table, column = %name, "Column added");
    Ok(Json(MessageResponse {
        message: "Column added successfully".to_string(),
    }))
}

/// Rename, retype and reconfigure a column in one transaction.
///
/// POST /api/editColumn
pub async fn edit_column(
    State(state): State<AppState>,
    Json(request): Json<EditColumnRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (schema, table) = request.table.validate()?;
    let old_name = require(&request.old_name, "oldName")?;
    let spec = request.fields.spec(require(&request.new_name, "newName")?)?;

    state
        .with_database(&request.table.target, |pool| async move {
            columns::edit_column(&pool, schema, table, old_name, &spec).await
        })
        .await?;

    tracing::info!(schema = %schema, table = %table, column = %old_name, "Column edited");
    Ok(Json(MessageResponse {
        message: "Column edited successfully".to_string(),
    }))
}

/// Drop a column.
///
/// POST /api/deleteColumn
pub async fn delete_column(
    State(state): State<AppState>,
    Json(request): Json<DeleteColumnRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (schema, table) = request.table.validate()?;
    let column = require(&request.column, "column")?;

    state
        .with_database(&request.table.target, |pool| async move {
            columns::drop_column(&pool, schema, table, column).await
        })
        .await?;

    tracing::info!(schema = %schema, table = %table, column = %column, "Column deleted");
    Ok(Json(MessageResponse {
        message: format!("Column {} deleted from table {}.{}", column, schema, table),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_column_request() {
        let json = r#"{
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "posts",
            "name": "title",
            "type": "varchar",
            "maxLength": "120",
            "defaultValue": "",
            "allowNull": true
        }"#;
        let request: AddColumnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.table.validate().unwrap(), ("public", "posts"));
        assert_eq!(request.name.as_deref(), Some("title"));

        let spec = request.fields.spec("title").unwrap();
        assert_eq!(spec.column_type.as_sql(), "VARCHAR(120)");
        assert!(spec.allow_null);
        assert_eq!(spec.default_expr(), None);
    }

    #[test]
    fn test_edit_column_request() {
        let json = r#"{
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "posts",
            "oldName": "views",
            "newName": "view_count",
            "type": "bigint",
            "defaultValue": 0
        }"#;
        let request: EditColumnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.old_name.as_deref(), Some("views"));
        assert_eq!(request.new_name.as_deref(), Some("view_count"));

        let spec = request.fields.spec("view_count").unwrap();
        assert!(!spec.allow_null);
        assert_eq!(spec.default_expr().as_deref(), Some("0"));
    }

    #[test]
    fn test_missing_type() {
        let fields: ColumnFields = serde_json::from_str(r#"{"allowNull": true}"#).unwrap();
        assert!(matches!(fields.spec("c"), Err(AppError::MissingField("type"))));
    }
}
