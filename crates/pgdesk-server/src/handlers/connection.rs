//! Connection test endpoint.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::queries::schema::server_time;
use crate::db::ConnectionTarget;
use crate::error::AppError;
use crate::extract::Json;
use crate::sanitize::redact_connection_string;
use crate::state::AppState;

/// Response for a successful connection test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub message: String,
    pub server_time: DateTime<Utc>,
    /// The resolved connection string, for the UI to save.
    pub connection_string: String,
}

/// Test a connection.
///
/// POST /api/connect
///
/// Accepts a connection string or the standard form fields.
pub async fn connect(
    State(state): State<AppState>,
    Json(target): Json<ConnectionTarget>,
) -> Result<Json<ConnectResponse>, AppError> {
    let connection_string = target.resolve()?;
    let now = state
        .with_database(&target, |pool| async move { server_time(&pool).await })
        .await?;

    tracing::info!(
        target_db = %redact_connection_string(&connection_string),
        "Connection successful"
    );

    Ok(Json(ConnectResponse {
        message: "Connection successful!".to_string(),
        server_time: now,
        connection_string,
    }))
}
