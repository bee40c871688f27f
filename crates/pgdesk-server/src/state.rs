//! Application state for the pgdesk API.
//!
//! This module defines the shared application state that is
//! passed to all handlers via Axum's state management.

use std::future::Future;
use std::sync::Arc;

use crate::config::{AppConfig, PoolConfig};
use crate::db::{self, ConnectionTarget, DbPool};
use crate::error::AppResult;
use crate::services::SessionStore;

/// Shared application state.
///
/// There is no database handle here: each request brings its own target.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Settings for request pools
    pub pool_config: Arc<PoolConfig>,

    /// Last used connection
    pub sessions: Arc<SessionStore>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state with the session store in the
    /// configured data directory.
    pub fn new(config: AppConfig, pool_config: PoolConfig) -> Self {
        let sessions = SessionStore::new(config.data_dir());
        Self {
            config: Arc::new(config),
            pool_config: Arc::new(pool_config),
            sessions: Arc::new(sessions),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Resolve `target`, open a request pool and run `f` against it.
    pub async fn with_database<T, F, Fut>(&self, target: &ConnectionTarget, f: F) -> AppResult<T>
    where
        F: FnOnce(DbPool) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let conn = target.resolve()?;
        db::with_pool(&conn, &self.config.application_name, &self.pool_config, f).await
    }
}
