//! Database queries.

pub mod columns;
pub mod data;
pub mod query;
pub mod schema;
