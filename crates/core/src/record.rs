//! Raw (string-typed) and typed record containers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// One row of loosely-typed input: field name -> raw string.
///
/// Built per row by the caller (e.g. from a CSV line) and consumed by the
/// validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A record whose fields were parsed and validated against a schema.
///
/// `row` is the zero-based position of the source row in the validator input,
/// so downstream reports can reference original row positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedRecord {
    row: usize,
    fields: BTreeMap<String, FieldValue>,
}

impl TypedRecord {
    pub fn new(row: usize, fields: BTreeMap<String, FieldValue>) -> Self {
        Self { row, fields }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Attach a derived field. Existing fields are never overwritten.
    ///
    /// Returns `false` (and leaves the record untouched) if `field` already exists.
    pub fn insert_derived(&mut self, field: impl Into<String>, value: FieldValue) -> bool {
        let field = field.into();
        if self.fields.contains_key(&field) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_builder_overwrites_same_key() {
        let raw = RawRecord::new().with("a", "1").with("a", "2").with("b", "x");
        assert_eq!(raw.get("a"), Some("2"));
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("missing"), None);
    }

    #[test]
    fn derived_fields_never_overwrite_originals() {
        let mut fields = BTreeMap::new();
        fields.insert("amount".to_string(), FieldValue::Float(5.0));
        let mut rec = TypedRecord::new(3, fields);

        assert!(!rec.insert_derived("amount", FieldValue::Float(99.0)));
        assert_eq!(rec.get("amount"), Some(&FieldValue::Float(5.0)));

        assert!(rec.insert_derived("rule_flag", FieldValue::from("high")));
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.row(), 3);
    }
}
