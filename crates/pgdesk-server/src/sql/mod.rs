//! SQL text builders.
//!
//! Nothing here talks to a database: these functions turn validated request
//! values into statements that the `db::queries` layer executes.

pub mod column;
pub mod quote;

pub use column::{ColumnSpec, ColumnType};
pub use quote::{qualified, quote_ident, quote_literal};
