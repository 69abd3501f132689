//! Raw, untyped request parameters

use crate::error::{Result, ValidationErrors};
use serde_json::Value as JsonValue;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Parameter name to raw value, exactly as the client sent it.
///
/// Values from a query string or form body are always text; a key that
/// repeats becomes an array of texts. JSON bodies keep their value types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    entries: BTreeMap<String, JsonValue>,
}

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and callers assembling bags by hand.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Collect decoded `(key, value)` pairs from a query string or form body.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: BTreeMap<String, JsonValue> = BTreeMap::new();
        for (key, value) in pairs {
            let value = JsonValue::String(value.into());
            match entries.entry(key.into()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    JsonValue::Array(values) => values.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = JsonValue::Array(vec![first, value]);
                    }
                },
            }
        }
        Self { entries }
    }

    /// Accepts only a JSON object; anything else is a `body` error.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            _ => Err(ValidationErrors::single(
                "body",
                "request body must be a JSON object",
            )),
        }
    }

    /// Present, non-null value for `name`.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.entries.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repeated_keys_become_arrays() {
        let bag = ParamBag::from_pairs(vec![
            ("tags", "work"),
            ("item", "bike"),
            ("tags", "motor"),
            ("tags", "mobile"),
        ]);
        assert_eq!(bag.get("item"), Some(&json!("bike")));
        assert_eq!(bag.get("tags"), Some(&json!(["work", "motor", "mobile"])));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn from_json_requires_an_object() {
        let bag = ParamBag::from_json(json!({ "price": 10, "tags": ["work"] })).unwrap();
        assert_eq!(bag.get("price"), Some(&json!(10)));

        let err = ParamBag::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.fields(), vec!["body"]);
    }

    #[test]
    fn null_values_count_as_absent() {
        let bag = ParamBag::from_json(json!({ "tag": null })).unwrap();
        assert!(!bag.contains("tag"));
        assert_eq!(bag.names().collect::<Vec<_>>(), vec!["tag"]);
    }
}
