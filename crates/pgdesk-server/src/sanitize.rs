//! Redaction of credentials before they reach the logs.
//!
//! Connection strings keep their host and database (useful when reading a
//! log) but lose the password. JSON payloads such as row updates have the
//! values of credential-looking keys replaced.

use serde_json::{Map, Value};
use url::Url;

/// Redaction placeholder
const REDACTED: &str = "[REDACTED]";

/// Keys whose values are never logged (lowercase, `-` folded to `_`).
static SENSITIVE_KEYS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "private_key",
    "connection_string",
    "connectionstring",
    "connect_url",
    "connecturl",
];

/// Check if a key indicates sensitive data.
fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase().replace('-', "_");
    SENSITIVE_KEYS
        .iter()
        .any(|sensitive| key_lower.contains(sensitive))
}

/// Mask the password of a PostgreSQL connection string.
///
/// Handles both URL form (`postgres://user:pw@host/db`) and key/value form
/// (`host=.. password=..`). Strings that are neither are returned unchanged.
pub fn redact_connection_string(conn: &str) -> String {
    if let Ok(mut url) = Url::parse(conn) {
        if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
            return REDACTED.to_string();
        }
        let has_password_param = url
            .query_pairs()
            .any(|(k, _)| k.eq_ignore_ascii_case("password"));
        if has_password_param {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| {
                    if k.eq_ignore_ascii_case("password") {
                        (k.into_owned(), REDACTED.to_string())
                    } else {
                        (k.into_owned(), v.into_owned())
                    }
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        return url.to_string();
    }

    conn.split_whitespace()
        .map(|part| match part.split_once('=') {
            Some((key, _)) if key.eq_ignore_ascii_case("password") => {
                format!("{}={}", key, REDACTED)
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recursively sanitize sensitive data from a JSON value.
///
/// Returns a new value; the input is left untouched.
pub fn sanitize_payload(value: &Value) -> Value {
    sanitize_recursive(value, 0, 20)
}

fn sanitize_recursive(value: &Value, depth: usize, max_depth: usize) -> Value {
    if depth >= max_depth {
        return value.clone();
    }

    match value {
        Value::Object(map) => {
            let mut result = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) {
                    result.insert(key.clone(), Value::String(REDACTED.to_string()));
                } else {
                    result.insert(key.clone(), sanitize_recursive(val, depth + 1, max_depth));
                }
            }
            Value::Object(result)
        }
        Value::Array(arr) => Value::Array(
            arr.iter()
                .map(|item| sanitize_recursive(item, depth + 1, max_depth))
                .collect(),
        ),
        _ => value.clone(),
    }
}
