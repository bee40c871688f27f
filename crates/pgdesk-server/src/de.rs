//! Lenient field deserializers.
//!
//! The UI posts form state as-is, so numeric inputs arrive either as JSON
//! numbers or as strings (`"50"`, `""`).

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

/// Accept a non-negative integer given as a number or a numeric string.
/// `null` and empty strings become `None`.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, got {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a non-negative integer, got {:?}", s))),
        Some(other) => Err(D::Error::custom(format!(
            "expected a non-negative integer, got {}",
            other
        ))),
    }
}

/// Accept a scalar as text: strings as-is, numbers and booleans rendered.
/// `null` becomes `None`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a scalar, got {}", other))),
    }
}
