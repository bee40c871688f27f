//! Database models and response shapes.

pub mod data;
pub mod schema;

pub use data::{QueryOutput, RowChange};
pub use schema::{ColumnInfo, SizeDetails, TableInfo, TablesBySchema};
