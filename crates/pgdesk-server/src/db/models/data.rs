//! Row data and query runner responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of an ad-hoc query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    /// Rows of the last statement that returned rows
    pub rows: Vec<Map<String, Value>>,

    /// Column names of `rows`, in select-list order
    pub fields: Vec<String>,

    /// Number of entries in `rows`
    pub row_count: usize,

    /// Sum of the row counts in every statement's command tag
    pub rows_affected: u64,
}

/// Outcome of a row update or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowChange {
    pub message: String,
    pub row_count: u64,
}
