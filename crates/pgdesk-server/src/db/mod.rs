//! Database module for the pgdesk API.
//!
//! This module provides per-request connectivity, models, and the queries
//! behind each endpoint, for PostgreSQL using SQLx.

pub mod connection;
pub mod models;
pub mod queries;
pub mod rows;

pub use connection::{with_pool, ConnectionTarget};

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = sqlx::PgPool;
