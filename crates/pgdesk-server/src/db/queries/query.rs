//! Ad-hoc query execution.

use futures::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::{Column, Either, Executor, Statement};

use crate::db::models::QueryOutput;
use crate::db::rows::{field_names, row_to_json};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Collects the result sets of a multi-statement run and keeps the last one.
///
/// Rows arrive before the command tag that ends their statement, so a result
/// set is only complete once [`ResultSets::finish_statement`] is called. A
/// statement without rows still replaces the previous set.
#[derive(Debug, Default)]
pub struct ResultSets {
    rows: Vec<Map<String, Value>>,
    fields: Vec<String>,
    last: Option<(Vec<Map<String, Value>>, Vec<String>)>,
    statements: usize,
    rows_affected: u64,
}

impl ResultSets {
    /// Add a row to the statement in progress. `fields` is only called for
    /// the first row of a statement.
    pub fn push_row(&mut self, fields: impl FnOnce() -> Vec<String>, row: Map<String, Value>) {
        if self.rows.is_empty() {
            self.fields = fields();
        }
        self.rows.push(row);
    }

    /// Close the statement in progress with its command tag count.
    pub fn finish_statement(&mut self, rows_affected: u64) {
        self.rows_affected += rows_affected;
        self.statements += 1;
        self.last = Some((std::mem::take(&mut self.rows), std::mem::take(&mut self.fields)));
    }

    /// Statements completed so far.
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// True when the reported result set has rows, so its fields are known.
    pub fn has_rows(&self) -> bool {
        match &self.last {
            Some((rows, _)) => !rows.is_empty(),
            None => !self.rows.is_empty(),
        }
    }

    pub fn into_output(self) -> QueryOutput {
        let (rows, fields) = match self.last {
            // rows after the last command tag only happen on a cut-off stream
            Some(_) if !self.rows.is_empty() => (self.rows, self.fields),
            Some(last) => last,
            None => (self.rows, self.fields),
        };
        QueryOutput {
            row_count: rows.len(),
            rows,
            fields,
            rows_affected: self.rows_affected,
        }
    }
}

/// Run user SQL through the simple query protocol.
///
/// Several `;`-separated statements are allowed; the result set of the last
/// statement is returned. For a single statement that returned no rows the
/// column names come from preparing it.
pub async fn run(pool: &DbPool, sql: &str) -> AppResult<QueryOutput> {
    let mut sets = ResultSets::default();

    let mut stream = sqlx::raw_sql(sql).fetch_many(pool);
    while let Some(step) = stream
        .try_next()
        .await
        .map_err(AppError::database("Failed to run query"))?
    {
        match step {
            Either::Left(result) => sets.finish_statement(result.rows_affected()),
            Either::Right(row) => sets.push_row(|| field_names(&row), row_to_json(&row)),
        }
    }
    drop(stream);

    let needs_fields = sets.statements() == 1 && !sets.has_rows();
    let mut output = sets.into_output();
    if needs_fields {
        match pool.prepare(sql).await {
            Ok(statement) => {
                output.fields = statement
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect();
            }
            Err(e) => tracing::debug!(error = %e, "Could not describe empty result set"),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    fn fields(names: &[&str]) -> impl FnOnce() -> Vec<String> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        move || names
    }

    #[test]
    fn test_single_select() {
        let mut sets = ResultSets::default();
        sets.push_row(fields(&["a"]), row(json!({"a": 1})));
        sets.push_row(fields(&["a"]), row(json!({"a": 2})));
        sets.finish_statement(2);

        assert!(sets.has_rows());
        let output = sets.into_output();
        assert_eq!(output.fields, vec!["a"]);
        assert_eq!(output.row_count, 2);
        assert_eq!(output.rows_affected, 2);
    }

    #[test]
    fn test_empty_last_statement_wins() {
        let mut sets = ResultSets::default();
        sets.push_row(fields(&["a"]), row(json!({"a": 1})));
        sets.finish_statement(1);
        sets.finish_statement(0);

        assert_eq!(sets.statements(), 2);
        assert!(!sets.has_rows());
        let output = sets.into_output();
        assert!(output.rows.is_empty());
        assert!(output.fields.is_empty());
        assert_eq!(output.row_count, 0);
        assert_eq!(output.rows_affected, 1);
    }

    #[test]
    fn test_last_of_two_selects() {
        let mut sets = ResultSets::default();
        sets.push_row(fields(&["a"]), row(json!({"a": 1})));
        sets.finish_statement(1);
        sets.push_row(fields(&["b", "c"]), row(json!({"b": 2, "c": 3})));
        sets.finish_statement(1);

        let output = sets.into_output();
        assert_eq!(output.fields, vec!["b", "c"]);
        assert_eq!(output.rows, vec![row(json!({"b": 2, "c": 3}))]);
        assert_eq!(output.rows_affected, 2);
    }

    #[test]
    fn test_update_then_select() {
        let mut sets = ResultSets::default();
        sets.finish_statement(3);
        sets.push_row(fields(&["n"]), row(json!({"n": 3})));
        sets.finish_statement(1);

        let output = sets.into_output();
        assert_eq!(output.fields, vec!["n"]);
        assert_eq!(output.row_count, 1);
        assert_eq!(output.rows_affected, 4);
    }

    #[test]
    fn test_nothing_run() {
        let sets = ResultSets::default();
        assert_eq!(sets.statements(), 0);
        let output = sets.into_output();
        assert!(output.rows.is_empty());
        assert_eq!(output.rows_affected, 0);
    }

    #[tokio::test]
    #[ignore = "needs PGDESK_TEST_DATABASE_URL"]
    async fn test_run_reports_last_result_set() {
        use crate::db::testing::{drop_schema, scratch_schema};

        let schema = "pgdesk_test_run";
        let pool = scratch_schema(schema).await;

        let output = run(&pool, "SELECT 1 AS a; SELECT 2 AS b WHERE false").await.unwrap();
        assert!(output.rows.is_empty());
        assert_eq!(output.row_count, 0);

        let output = run(&pool, "SELECT 1 AS a WHERE false").await.unwrap();
        assert!(output.rows.is_empty());
        assert_eq!(output.fields, vec!["a"]);

        let output = run(
            &pool,
            &format!(
                "CREATE TABLE {schema}.t (n int); INSERT INTO {schema}.t VALUES (1), (2); \
                 SELECT n, n * 10 AS m FROM {schema}.t ORDER BY n"
            ),
        )
        .await
        .unwrap();
        assert_eq!(output.fields, vec!["n", "m"]);
        assert_eq!(output.rows[1]["m"], json!(20));
        assert_eq!(output.rows_affected, 4);

        drop_schema(pool, schema).await;
    }
}
