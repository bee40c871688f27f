//! Column DDL: type rendering and the `ALTER TABLE` statements behind the
//! structure editor.

use crate::error::{AppError, AppResult};
use crate::sql::quote::{qualified, quote_ident, quote_literal};

/// Types whose default values are written as quoted string literals.
const TEXTUAL_TYPES: &[&str] = &["text", "varchar", "char", "character varying", "character"];

/// A validated column type as it will appear in DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    base: String,
    rendered: String,
}

impl ColumnType {
    /// Validate a user supplied type name.
    ///
    /// `varchar` combined with a max length renders as `VARCHAR(n)`; every
    /// other type renders upper-cased. The max length is ignored for other
    /// types.
    pub fn parse(raw: &str, max_length: Option<u32>) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingField("type"));
        }
        let allowed = |c: char| {
            c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '(' | ')' | ',' | '[' | ']')
        };
        if !trimmed.chars().all(allowed) {
            return Err(AppError::BadRequest(format!(
                "Invalid column type: {}",
                trimmed
            )));
        }

        let base = trimmed.to_lowercase();
        let rendered = match max_length {
            Some(0) if base == "varchar" => {
                return Err(AppError::BadRequest(
                    "maxLength must be a positive integer".to_string(),
                ))
            }
            Some(len) if base == "varchar" => format!("VARCHAR({})", len),
            _ => trimmed.to_uppercase(),
        };

        Ok(Self { base, rendered })
    }

    /// Defaults for this type are string literals.
    pub fn is_textual(&self) -> bool {
        TEXTUAL_TYPES.contains(&self.base.as_str())
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.base.as_str(), "boolean" | "bool")
    }

    /// The type as written in DDL.
    pub fn as_sql(&self) -> &str {
        &self.rendered
    }
}

/// Desired definition of a column, shared by add and edit.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    /// Raw default as typed in the UI; `None` or empty means no default.
    pub default: Option<String>,
    pub allow_null: bool,
}

impl ColumnSpec {
    /// The default clause body, quoted for textual types and passed through
    /// as an expression otherwise.
    pub fn default_expr(&self) -> Option<String> {
        match self.default.as_deref() {
            None | Some("") => None,
            Some(value) if self.column_type.is_textual() => Some(quote_literal(value)),
            Some(value) => Some(value.to_string()),
        }
    }

    fn null_clause(&self) -> &'static str {
        if self.allow_null {
            "NULL"
        } else {
            "NOT NULL"
        }
    }
}

/// `ALTER TABLE .. ADD COLUMN ..`
pub fn add_column_sql(schema: &str, table: &str, spec: &ColumnSpec) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {} {}",
        qualified(schema, table),
        quote_ident(&spec.name),
        spec.column_type.as_sql(),
        spec.null_clause()
    );
    if let Some(default) = spec.default_expr() {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default);
    }
    sql
}

/// `ALTER TABLE .. DROP COLUMN ..`
pub fn drop_column_sql(schema: &str, table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        qualified(schema, table),
        quote_ident(column)
    )
}

/// Statements that bring column `old_name` to `spec`, in execution order.
///
/// The caller runs them inside one transaction: rename (only when the name
/// changes), drop the old default, type, nullability, then the new default.
/// The old default goes first since it may not cast to the new type.
pub fn edit_column_statements(
    schema: &str,
    table: &str,
    old_name: &str,
    spec: &ColumnSpec,
) -> Vec<String> {
    let target = qualified(schema, table);
    let column = quote_ident(&spec.name);
    let mut statements = Vec::with_capacity(5);

    if old_name != spec.name {
        statements.push(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            target,
            quote_ident(old_name),
            column
        ));
    }

    statements.push(format!(
        "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
        target, column
    ));

    if spec.column_type.is_boolean() {
        statements.push(format!(
            "ALTER TABLE {target} ALTER COLUMN {column} TYPE BOOLEAN USING \
             CASE WHEN lower({column}::text) IN ('true', 't', '1', 'yes', 'y', 'on') \
             THEN true ELSE false END"
        ));
    } else {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            target,
            column,
            spec.column_type.as_sql()
        ));
    }

    if spec.allow_null {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} DROP NOT NULL",
            target, column
        ));
    } else {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
            target, column
        ));
    }

    if let Some(default) = spec.default_expr() {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
            target, column, default
        ));
    }

    statements
}
