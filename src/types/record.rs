//! Insertion-ordered record type

use super::Value;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A flat row: field names mapped to values, in insertion order.
///
/// Backed by an association list rather than a hash map so that column
/// order survives projection, equality checks, and serialization. Rows are
/// small (a handful of fields), so linear lookup is fine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Update an existing field in place, or append a new one.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set(&name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                // document order becomes field order
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    record.set(&name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), Value::Text(value.to_string())))
            .collect()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let r = record(&[("name", "Alice"), ("city", "Berlin"), ("age", "30")]);
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["name", "city", "age"]);
    }

    #[test]
    fn test_set_updates_in_place() {
        let mut r = record(&[("name", "Alice"), ("age", "30")]);
        r.set("name", Value::Text("Bob".into()));
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["name", "age"]);
        assert_eq!(r.get("name"), Some(&Value::Text("Bob".into())));
    }

    #[test]
    fn test_set_appends_new_field() {
        let mut r = record(&[("name", "Alice")]);
        r.set("city", Value::Text("Paris".into()));
        assert_eq!(r.len(), 2);
        assert_eq!(r.field_names().last(), Some("city"));
    }

    #[test]
    fn test_serde_preserves_field_order() {
        let r = record(&[("z", "1"), ("a", "2"), ("m", "3")]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2","m":"3"}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
