//! Error types for the pgdesk API.
//!
//! Every handler returns [`AppResult`]; the error side renders as a JSON body
//! of the form `{"error": .., "details": .., "status": ..}` so the UI can show
//! the message without knowing which endpoint failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required request field was missing or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Bad request error (invalid values, unknown columns, ...).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Could not open a connection to the target database.
    #[error("Failed to connect to the database")]
    Connect(#[source] sqlx::Error),

    /// A statement against the target database failed.
    #[error("{context}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Saved session could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a driver error with the operation that failed.
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| AppError::Database { context, source }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Connect(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database { .. }
            | AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Connect(e) | AppError::Database { source: e, .. } => Some(driver_message(e)),
            _ => None,
        }
    }
}

/// The database's own message for a failed statement, falling back to the
/// driver's rendering for transport errors.
fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = self.details();

        match &self {
            AppError::Connect(e) => {
                tracing::warn!(error = %e, "Connection failed");
            }
            AppError::Database { context, source } => {
                tracing::error!(error = %source, context = %context, "Database error");
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Session storage error");
            }
            AppError::Serialization(e) => {
                tracing::error!(error = %e, "Serialization error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
            }
            AppError::MissingField(_) | AppError::BadRequest(_) | AppError::NotFound(_) => {
                tracing::debug!(error = %self, "Rejected request");
            }
        }

        let error_message = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Return a required string field as sent, or [`AppError::MissingField`]
/// when it is absent or blank. Identifiers may carry surrounding spaces, so
/// the value is not trimmed.
pub fn require<'a>(value: &'a Option<String>, field: &'static str) -> AppResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field)),
    }
}
