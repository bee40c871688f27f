//! HTTP handlers for the pgdesk API.
//!
//! This module contains all route handlers organized by area. Every data
//! handler validates its request completely before opening a connection.

use serde::Deserialize;

use crate::db::ConnectionTarget;
use crate::error::{require, AppResult};

pub mod columns;
pub mod connection;
pub mod health;
pub mod query;
pub mod rows;
pub mod schema;
pub mod session;

pub use health::{api_health, health_check};

/// Body shared by the endpoints that act on one table.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRequest {
    #[serde(flatten)]
    pub target: ConnectionTarget,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub table: Option<String>,
}

impl TableRequest {
    /// Check the connection target, then return `(schema, table)`.
    pub fn validate(&self) -> AppResult<(&str, &str)> {
        self.target.resolve()?;
        Ok((require(&self.schema, "schema")?, require(&self.table, "table")?))
    }
}
