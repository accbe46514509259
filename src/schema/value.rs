//! Record values keyed by wire key

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::FieldKind;

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Text(String),
    /// Enum tag
    Enum(i64),
    Timestamp(i64),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Enum(_) => "enum",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Whether this value may be stored in a field of `kind`
    pub fn matches(&self, kind: &FieldKind) -> bool {
        matches!(
            (self, kind),
            (Value::Integer(_), FieldKind::Integer64)
                | (Value::Boolean(_), FieldKind::Boolean)
                | (Value::Bytes(_), FieldKind::Bytes)
                | (Value::Text(_), FieldKind::Text)
                | (Value::Enum(_), FieldKind::Enum(_))
                | (Value::Timestamp(_), FieldKind::Timestamp)
        )
    }
}

/// One record: wire key to value.
///
/// Built field by field by the producer before encoding, or handed out by
/// the decoder. Iteration is ordered by wire key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordValue {
    fields: BTreeMap<String, Value>,
}

impl RecordValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, wire_key: &str, value: Value) -> Self {
        self.insert(wire_key, value);
        self
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(&mut self, wire_key: &str, value: Value) -> Option<Value> {
        self.fields.insert(wire_key.to_string(), value)
    }

    pub fn get(&self, wire_key: &str) -> Option<&Value> {
        self.fields.get(wire_key)
    }

    pub fn contains(&self, wire_key: &str) -> bool {
        self.fields.contains_key(wire_key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire keys present in this record
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn integer(&self, wire_key: &str) -> Option<i64> {
        match self.get(wire_key)? {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn boolean(&self, wire_key: &str) -> Option<bool> {
        match self.get(wire_key)? {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn bytes(&self, wire_key: &str) -> Option<&[u8]> {
        match self.get(wire_key)? {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn text(&self, wire_key: &str) -> Option<&str> {
        match self.get(wire_key)? {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn enum_tag(&self, wire_key: &str) -> Option<i64> {
        match self.get(wire_key)? {
            Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn timestamp(&self, wire_key: &str) -> Option<i64> {
        match self.get(wire_key)? {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for RecordValue {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
