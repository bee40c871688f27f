//! Saved session handlers.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::connection::connect_options;
use crate::error::{require, AppError};
use crate::extract::Json;
use crate::services::SavedSession;
use crate::state::AppState;

/// Request to save a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionRequest {
    #[serde(default)]
    pub connect_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearSessionResponse {
    pub message: String,
}

/// Load the saved session.
///
/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Result<Json<SavedSession>, AppError> {
    Ok(Json(state.sessions.load().await?))
}

/// Save the connection the UI is using.
///
/// PUT /api/session
pub async fn save_session(
    State(state): State<AppState>,
    Json(request): Json<SaveSessionRequest>,
) -> Result<Json<SavedSession>, AppError> {
    let connect_url = require(&request.connect_url, "connectUrl")?;
    connect_options(connect_url, &state.config.application_name, &state.pool_config)?;

    Ok(Json(state.sessions.save(connect_url).await?))
}

/// Forget the saved session.
///
/// DELETE /api/session
pub async fn clear_session(
    State(state): State<AppState>,
) -> Result<Json<ClearSessionResponse>, AppError> {
    state.sessions.clear().await?;
    Ok(Json(ClearSessionResponse {
        message: "Session cleared".to_string(),
    }))
}
