//! Deserialization helpers for vendor payloads.
//!
//! SOAP responses are converted to JSON without a schema, so a list with a
//! single item arrives as a bare object, an empty list is missing entirely,
//! and numbers arrive as strings. These helpers smooth that over.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a list that may be encoded as a single item, null, or an empty string.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    list_from_value(value).map_err(D::Error::custom)
}

/// Converts a loosely-encoded list value into typed items.
pub fn list_from_value<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    into_list(value)
        .into_iter()
        .map(serde_json::from_value)
        .collect()
}

/// Flattens a loosely-encoded list value into its items.
pub fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Deserializes an unsigned number that may be encoded as a string.
pub fn number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("expected unsigned number, got {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("expected unsigned number, got '{}'", s))),
        other => Err(D::Error::custom(format!(
            "expected unsigned number, got {}",
            other
        ))),
    }
}

/// Deserializes a boolean that may be encoded as `"true"` / `"false"`.
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("expected boolean, got '{}'", other))),
        },
        other => Err(D::Error::custom(format!("expected boolean, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "one_or_many")]
        items: Vec<String>,
        #[serde(deserialize_with = "number")]
        count: u64,
    }

    #[test]
    fn test_single_item_becomes_list() {
        let wrapper: Wrapper = serde_json::from_value(json!({"items": "a", "count": "3"})).unwrap();
        assert_eq!(wrapper.items, vec!["a".to_string()]);
        assert_eq!(wrapper.count, 3);
    }

    #[test]
    fn test_missing_and_empty_lists() {
        let wrapper: Wrapper = serde_json::from_value(json!({"count": 1})).unwrap();
        assert!(wrapper.items.is_empty());

        let wrapper: Wrapper = serde_json::from_value(json!({"items": "", "count": 1})).unwrap();
        assert!(wrapper.items.is_empty());
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let result: Result<Wrapper, _> = serde_json::from_value(json!({"count": "many"}));
        assert!(result.is_err());
    }
}
