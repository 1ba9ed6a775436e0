//! Row records supplied by the host's data provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name → raw value mapping for one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord(pub Map<String, Value>);

impl RowRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Raw value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether at least one field holds a non-empty value.
    ///
    /// Used as the "has real data" guard before auto-sizing, so placeholder
    /// rows (all nulls/empty strings) don't size the grid.
    pub fn has_any_value(&self) -> bool {
        self.0.values().any(|v| !is_empty_value(v))
    }
}

impl From<Map<String, Value>> for RowRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Empty values measure as zero width: null, `false`, `0`, NaN and `""`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Text form of a raw value as the grid would print it.
///
/// Strings are used verbatim (no JSON quoting); other scalars use their JSON
/// spelling. Null becomes the empty string.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!(0)));
        assert!(is_empty_value(&json!(0.0)));
        assert!(is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("0")));
        assert!(!is_empty_value(&json!(12)));
        assert!(!is_empty_value(&json!(true)));
        assert!(!is_empty_value(&json!([])));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "");
    }

    #[test]
    fn test_has_any_value() {
        let placeholder: RowRecord = serde_json::from_value(json!({"a": null, "b": ""}))
            .unwrap_or_default();
        assert!(!placeholder.has_any_value());

        let real: RowRecord =
            serde_json::from_value(json!({"a": null, "b": "x"})).unwrap_or_default();
        assert!(real.has_any_value());

        assert!(!RowRecord::new().has_any_value());
    }
}
