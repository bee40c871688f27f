//! pgdesk API Library
//!
//! This crate provides the local HTTP service behind the pgdesk desktop UI.
//! Every request names a PostgreSQL database (connection string or the
//! standard host/port/user fields) and the service runs the matching
//! statement against it:
//!
//! - **Schema browsing**: list schemas and tables, column structure, sizes
//! - **Structure editing**: add, edit and drop columns
//! - **Data editing**: page through rows, update or delete a single row
//! - **Query runner**: arbitrary SQL with JSON rendered results
//! - **Saved session**: remember the last connection across restarts
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Per-request connections, queries and row rendering
//! - [`sql`]: Quoting and DDL text builders
//! - [`error`]: Custom error types with Axum integration
//! - [`extract`]: JSON body extractor with `AppError` rejections
//! - [`handlers`]: HTTP route handlers
//! - [`router`]: Route table
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use pgdesk_server::{
//!     config::{AppConfig, PoolConfig},
//!     router::build_router,
//!     state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let pool_config = PoolConfig::from_env()?;
//!     let app = build_router(AppState::new(app_config, pool_config));
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod de;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod sanitize;
pub mod services;
pub mod sql;
pub mod state;

pub use error::{AppError, AppResult};
