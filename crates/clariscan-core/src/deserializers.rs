//! Forgiving field deserializers for service payloads.
//!
//! A field that is null or of the wrong type reads as absent instead of
//! failing the whole record it belongs to.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Numbers as-is, numeric strings parsed; anything else is `None`.
pub fn de_option_f64_forgiving<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

/// Strings as-is; anything else is `None`.
pub fn de_option_string_forgiving<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Strings as-is; anything else is the empty string.
pub fn de_string_forgiving<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_option_string_forgiving(deserializer)?.unwrap_or_default())
}
