//! Table browsing and single-row editing handlers.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::db::models::RowChange;
use crate::db::queries::data::{self, BrowseOptions};
use crate::de;
use crate::error::{require, AppError, AppResult};
use crate::extract::Json;
use crate::handlers::TableRequest;
use crate::sanitize::sanitize_payload;
use crate::state::AppState;

fn default_primary_key() -> Option<String> {
    Some("id".to_string())
}

/// Request for a page of table rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableValuesRequest {
    #[serde(flatten)]
    pub table: TableRequest,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub limit: Option<u32>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub offset: Option<u32>,

    #[serde(default)]
    pub order_by: Option<String>,

    /// "asc" (default) or "desc"
    #[serde(default)]
    pub direction: Option<String>,
}

impl TableValuesRequest {
    /// Paging options, with the limit capped at `max_limit`.
    pub fn browse_options(&self, max_limit: u32) -> AppResult<BrowseOptions> {
        let descending = match self.direction.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "direction must be asc or desc, got {}",
                    other
                )))
            }
        };

        Ok(BrowseOptions {
            limit: self.limit.unwrap_or(max_limit).min(max_limit),
            offset: self.offset.map(u64::from).unwrap_or(0),
            order_by: self
                .order_by
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            descending,
        })
    }
}

/// Row identified by a key column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowKeyRequest {
    #[serde(flatten)]
    pub table: TableRequest,

    #[serde(default = "default_primary_key")]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub primary_key_value: Option<Value>,
}

impl RowKeyRequest {
    /// Validate and return `(schema, table, key column, key value)`.
    fn validate(&self) -> AppResult<(&str, &str, &str, &Value)> {
        let (schema, table) = self.table.validate()?;
        let key_column = require(&self.primary_key, "primaryKey")?;
        let key_value = self
            .primary_key_value
            .as_ref()
            .ok_or(AppError::MissingField("primaryKeyValue"))?;
        Ok((schema, table, key_column, key_value))
    }
}

/// Request to update one row.
#[derive(Debug, Clone, Deserialize)]
pub struct EditRowRequest {
    #[serde(flatten)]
    pub key: RowKeyRequest,

    #[serde(default)]
    pub updates: Option<Map<String, Value>>,
}

fn no_match(schema: &str, table: &str, key_column: &str, key_value: &Value) -> AppError {
    AppError::NotFound(format!(
        "No row in {}.{} where {} = {}",
        schema, table, key_column, key_value
    ))
}

/// Browse rows of a table.
///
/// POST /api/getTableValues
pub async fn get_table_values(
    State(state): State<AppState>,
    Json(request): Json<TableValuesRequest>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let (schema, table) = request.table.validate()?;
    let options = request.browse_options(state.config.row_limit)?;

    let rows = state
        .with_database(&request.table.target, |pool| async move {
            data::fetch_rows(&pool, schema, table, &options).await
        })
        .await?;
    Ok(Json(rows))
}

/// Update one row.
///
/// POST /api/editRow
pub async fn edit_row(
    State(state): State<AppState>,
    Json(request): Json<EditRowRequest>,
) -> Result<Json<RowChange>, AppError> {
    let (schema, table, key_column, key_value) = request.key.validate()?;
    let updates = request
        .updates
        .as_ref()
        .ok_or(AppError::MissingField("updates"))?;
    if updates.is_empty() {
        return Err(AppError::BadRequest("updates must not be empty".to_string()));
    }

    let logged = sanitize_payload(&Value::Object(updates.clone()));
    tracing::debug!(schema = %schema, table = %table, updates = %logged, "Updating row");

    let row_count = state
        .with_database(&request.key.table.target, |pool| async move {
            data::update_row(&pool, schema, table, key_column, key_value, updates).await
        })
        .await?;

    if row_count == 0 {
        return Err(no_match(schema, table, key_column, key_value));
    }
    Ok(Json(RowChange {
        message: "Row updated successfully".to_string(),
        row_count,
    }))
}

/// Delete one row.
///
/// POST /api/deleteRow
pub async fn delete_row(
    State(state): State<AppState>,
    Json(request): Json<RowKeyRequest>,
) -> Result<Json<RowChange>, AppError> {
    let (schema, table, key_column, key_value) = request.validate()?;

    let row_count = state
        .with_database(&request.table.target, |pool| async move {
            data::delete_row(&pool, schema, table, key_column, key_value).await
        })
        .await?;

    if row_count == 0 {
        return Err(no_match(schema, table, key_column, key_value));
    }
    tracing::info!(schema = %schema, table = %table, rows = row_count, "Row deleted");
    Ok(Json(RowChange {
        message: "Row deleted successfully".to_string(),
        row_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values_request(extra: Value) -> TableValuesRequest {
        let mut body = json!({
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "users"
        });
        body.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_browse_defaults() {
        let options = values_request(json!({})).browse_options(1000).unwrap();
        assert_eq!(
            options,
            BrowseOptions {
                limit: 1000,
                offset: 0,
                order_by: None,
                descending: false,
            }
        );
    }

    #[test]
    fn test_browse_limit_is_capped() {
        let request = values_request(json!({"limit": 5000, "offset": "20", "orderBy": "email", "direction": "DESC"}));
        let options = request.browse_options(1000).unwrap();
        assert_eq!(options.limit, 1000);
        assert_eq!(options.offset, 20);
        assert_eq!(options.order_by.as_deref(), Some("email"));
        assert!(options.descending);
    }

    #[test]
    fn test_browse_bad_direction() {
        let request = values_request(json!({"direction": "sideways"}));
        assert!(matches!(
            request.browse_options(1000),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_row_key_defaults_to_id() {
        let request: RowKeyRequest = serde_json::from_value(json!({
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "users",
            "primaryKeyValue": 7
        }))
        .unwrap();
        let (_, _, key_column, key_value) = request.validate().unwrap();
        assert_eq!(key_column, "id");
        assert_eq!(key_value, &json!(7));
    }

    #[test]
    fn test_row_key_value_required() {
        let request: RowKeyRequest = serde_json::from_value(json!({
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "users",
            "primaryKeyValue": null
        }))
        .unwrap();
        assert!(matches!(
            request.validate(),
            Err(AppError::MissingField("primaryKeyValue"))
        ));
    }

    #[test]
    fn test_edit_row_request() {
        let request: EditRowRequest = serde_json::from_value(json!({
            "connectionString": "postgres://localhost/app",
            "schema": "public",
            "table": "users",
            "primaryKey": "user_id",
            "primaryKeyValue": "42",
            "updates": {"email": "new@example.com", "nickname": null}
        }))
        .unwrap();
        assert_eq!(request.key.primary_key.as_deref(), Some("user_id"));
        let updates = request.updates.unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates["nickname"].is_null());
    }
}
