//! Saved session: the last connection the UI used, kept across restarts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::sanitize::redact_connection_string;

const SESSION_FILE: &str = "session.json";

/// What the UI stores between launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub connect_url: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

/// File-backed store for [`SavedSession`].
///
/// Writes are serialized through a mutex and land via a temp file and a
/// rename, so a reader never sees a half-written file.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Create a store keeping `session.json` in `dir`. The directory is
    /// created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session. A missing file is an empty session; an
    /// unreadable one is logged and treated as empty.
    pub async fn load(&self) -> AppResult<SavedSession> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SavedSession::default()),
            Err(e) => return Err(AppError::Storage(e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable session file"
                );
                Ok(SavedSession::default())
            }
        }
    }

    /// Persist `connect_url` as the current session.
    pub async fn save(&self, connect_url: &str) -> AppResult<SavedSession> {
        let session = SavedSession {
            connect_url: Some(connect_url.to_string()),
            saved_at: Some(Utc::now()),
        };
        let body = serde_json::to_vec_pretty(&session)?;

        let _guard = self.write_lock.lock().await;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::info!(
            connect_url = %redact_connection_string(connect_url),
            path = %self.path.display(),
            "Session saved"
        );
        Ok(session)
    }

    /// Forget the saved session. Clearing an empty store is not an error.
    pub async fn clear(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}
