//! Ad-hoc query runner handler.

use axum::extract::State;
use serde::Deserialize;

use crate::db::models::QueryOutput;
use crate::db::queries::query;
use crate::db::ConnectionTarget;
use crate::error::{require, AppError};
use crate::extract::Json;
use crate::state::AppState;

/// Request for running SQL.
#[derive(Debug, Clone, Deserialize)]
pub struct RunQueryRequest {
    #[serde(flatten)]
    pub target: ConnectionTarget,

    /// SQL text; may hold several statements.
    #[serde(default)]
    pub query: Option<String>,
}

/// Run user SQL.
///
/// POST /api/runQuery
pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<RunQueryRequest>,
) -> Result<Json<QueryOutput>, AppError> {
    request.target.resolve()?;
    let sql = require(&request.query, "query")?;

    let started = std::time::Instant::now();
    let output = state
        .with_database(&request.target, |pool| async move { query::run(&pool, sql).await })
        .await?;

    tracing::info!(
        rows = output.row_count,
        rows_affected = output.rows_affected,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Query executed"
    );
    Ok(Json(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_query_request() {
        let json = r#"{"connectionString": "postgres://localhost/app", "query": "SELECT 1; SELECT 2"}"#;
        let request: RunQueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query.as_deref(), Some("SELECT 1; SELECT 2"));
        assert!(request.target.resolve().is_ok());
    }

    #[test]
    fn test_query_output_serialization() {
        let output = QueryOutput {
            rows: vec![serde_json::json!({"n": 1}).as_object().unwrap().clone()],
            fields: vec!["n".to_string()],
            row_count: 1,
            rows_affected: 1,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["fields"], serde_json::json!(["n"]));
        assert_eq!(json["rowCount"], 1);
        assert_eq!(json["rowsAffected"], 1);
        assert_eq!(json["rows"][0]["n"], 1);
    }
}
