use crate::stmt::Value;

use std::fmt;

/// A key value normalized for grouping, so `1` and `"1"` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Key(Vec<String>);

impl Key {
    pub(crate) fn of(value: &Value) -> Option<Key> {
        scalar(value).map(|part| Key(vec![part]))
    }

    /// A key made of several columns. `None` if any part is missing or null.
    pub(crate) fn composite<'a>(parts: impl IntoIterator<Item = Option<&'a Value>>) -> Option<Key> {
        parts
            .into_iter()
            .map(|part| part.and_then(scalar))
            .collect::<Option<Vec<_>>>()
            .filter(|parts| !parts.is_empty())
            .map(Key)
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_strings_match() {
        assert_eq!(Key::of(&json!(1)), Key::of(&json!("1")));
        assert_ne!(Key::of(&json!(1)), Key::of(&json!(2)));
    }

    #[test]
    fn null_has_no_key() {
        assert_eq!(Key::of(&Value::Null), None);
        assert_eq!(Key::composite([Some(&json!("t1")), Some(&Value::Null)]), None);
        assert_eq!(Key::composite([Some(&json!("t1")), None]), None);
        assert_eq!(Key::composite([]), None);
    }

    #[test]
    fn composite_order_matters() {
        let ab = Key::composite([Some(&json!("a")), Some(&json!("b"))]);
        let ba = Key::composite([Some(&json!("b")), Some(&json!("a"))]);
        assert_ne!(ab, ba);
        assert_eq!(ab.map(|key| key.to_string()).as_deref(), Some("a, b"));
    }
}
