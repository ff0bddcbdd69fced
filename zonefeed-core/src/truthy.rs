//! Truthiness test shared by the required-field checks.

use serde_json::Value;

/// JSON truthiness used by the required-field checks.
///
/// `null`, `false`, zero, the empty string and empty containers are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
