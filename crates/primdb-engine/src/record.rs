//! Rows.
//!
//! A [`Record`] maps column names to values and keeps them in the order they
//! were added, which for inserted rows is schema order. On disk a record is a
//! JSON object with `ID` as its first key.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use primdb_common::ID_COLUMN;

use crate::value::Value;

/// The rows of one table in storage order.
pub type RowList = Vec<Record>;

/// One row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record holding only its identifier.
    pub fn with_id(id: i64) -> Self {
        let mut record = Self::new();
        record.set(ID_COLUMN, Value::Int(id));
        record
    }

    /// Returns the record's identifier, if it has an integer `ID`.
    pub fn id(&self) -> Option<i64> {
        self.get(ID_COLUMN).and_then(Value::as_int)
    }

    /// Gets the value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Sets a column, replacing its value in place or appending it.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value.into());
        self
    }

    /// Iterates over `(column, value)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Highest identifier among `rows`, or 0 when there are none.
pub fn max_id(rows: &[Record]) -> i64 {
    rows.iter().filter_map(Record::id).max().unwrap_or(0)
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
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object of column values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            record.set(name, value);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_insertion_order() {
        let record = Record::with_id(1).with("name", "Alice").with("age", 30);

        let columns: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(columns, vec!["ID", "name", "age"]);
        assert_eq!(record.id(), Some(1));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut record = Record::with_id(1).with("age", 30);
        record.set("age", Value::Int(31));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("age"), Some(&Value::Int(31)));
    }

    #[test]
    fn test_max_id() {
        assert_eq!(max_id(&[]), 0);

        let rows = vec![Record::with_id(3), Record::with_id(7), Record::with_id(5)];
        assert_eq!(max_id(&rows), 7);
    }

    #[test]
    fn test_json_object_order() {
        let record = Record::with_id(1)
            .with("name", "Alice")
            .with("age", 30)
            .with("admin", false);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ID":1,"name":"Alice","age":30,"admin":false}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_id() {
        let record: Record = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(record.id(), None);
    }
}
