//! Row records and row identity

use std::fmt;

use serde_json::{Map, Value};

/// A record: field name -> value, in insertion order
pub type Row = Map<String, Value>;

/// Default identity field
pub const DEFAULT_ROW_KEY: &str = "id";

/// The identity of a row, independent of its index
///
/// Derived from the configured identity field. Numbers and strings with the
/// same text compare equal, so `1` and `"1"` address the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of `row` under `field`, if the field is present and not null
    pub fn of(row: &Row, field: &str) -> Option<Self> {
        row.get(field).and_then(Self::from_value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            other => Some(Self(value_text(other))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// Plain text of a value as a loosely typed host would print it
///
/// `null` is empty, strings are unquoted, whole floats drop their `.0`.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Build a row from `(field, value)` pairs
pub fn row_from<I, K, V>(fields: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_key_from_number_and_string() {
        let a = row_from([("id", json!(1))]);
        let b = row_from([("id", json!("1"))]);
        assert_eq!(RowKey::of(&a, "id"), RowKey::of(&b, "id"));
    }

    #[test]
    fn test_row_key_missing_or_null() {
        let row = row_from([("id", Value::Null)]);
        assert_eq!(RowKey::of(&row, "id"), None);
        assert_eq!(RowKey::of(&row, "uuid"), None);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&json!(3)), "3");
        assert_eq!(value_text(&json!(3.0)), "3");
        assert_eq!(value_text(&json!(2.5)), "2.5");
        assert_eq!(value_text(&json!(true)), "true");
    }
}
