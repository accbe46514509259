//! Schema Types - Record and Field Definitions
//!
//! Static descriptions of the records exchanged with the ledger. A schema
//! binds each in-memory field name to a stable wire key and a wire type.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while defining schemas or registering them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record '{record}': duplicate wire key '{wire_key}'")]
    DuplicateWireKey { record: String, wire_key: String },

    #[error("record '{record}': field '{field}' has an empty wire key")]
    EmptyWireKey { record: String, field: String },

    #[error("enum '{0}' declares no variants")]
    EmptyEnum(String),

    #[error("enum '{name}': tag {tag} declared twice")]
    DuplicateEnumTag { name: String, tag: i64 },

    #[error("record '{0}' is already registered")]
    DuplicateRecord(String),
}

/// Closed set of named integer tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum name
    pub name: String,
    /// Variants in declaration order (name, tag)
    pub variants: Vec<(String, i64)>,
}

impl EnumDef {
    /// Create a new enum with no variants
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variants: Vec::new(),
        }
    }

    /// Add a variant
    pub fn variant(mut self, name: &str, tag: i64) -> Self {
        self.variants.push((name.to_string(), tag));
        self
    }

    /// Check if tag is a declared variant
    pub fn is_valid(&self, tag: i64) -> bool {
        self.variants.iter().any(|&(_, t)| t == tag)
    }

    /// Get variant name for tag
    pub fn variant_name(&self, tag: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|&&(_, t)| t == tag)
            .map(|(name, _)| name.as_str())
    }

    /// Get tag for variant name
    pub fn tag_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, tag)| tag)
    }

    fn check(&self) -> Result<(), SchemaError> {
        if self.variants.is_empty() {
            return Err(SchemaError::EmptyEnum(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for &(_, tag) in &self.variants {
            if !seen.insert(tag) {
                return Err(SchemaError::DuplicateEnumTag {
                    name: self.name.clone(),
                    tag,
                });
            }
        }
        Ok(())
    }
}

/// Wire type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// 64-bit signed integer
    Integer64,
    /// Single byte 0/1
    Boolean,
    /// Length-prefixed raw bytes
    Bytes,
    /// Length-prefixed UTF-8
    Text,
    /// Integer tag restricted to the variants of the definition
    Enum(EnumDef),
    /// Opaque epoch offset, encoded as Integer64
    Timestamp,
}

impl FieldKind {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Integer64 => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Bytes => "bytes",
            FieldKind::Text => "text",
            FieldKind::Enum(_) => "enum",
            FieldKind::Timestamp => "timestamp",
        }
    }
}

/// A field in a record schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// In-memory field name
    pub name: String,
    /// Wire type
    pub kind: FieldKind,
    /// Stable identifier on the wire
    pub wire_key: String,
}

impl FieldSpec {
    /// Create a field of any kind
    pub fn new(name: &str, kind: FieldKind, wire_key: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            wire_key: wire_key.to_string(),
        }
    }

    pub fn integer(name: &str, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Integer64, wire_key)
    }

    pub fn boolean(name: &str, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Boolean, wire_key)
    }

    pub fn bytes(name: &str, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Bytes, wire_key)
    }

    pub fn text(name: &str, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Text, wire_key)
    }

    pub fn enumeration(name: &str, def: EnumDef, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Enum(def), wire_key)
    }

    pub fn timestamp(name: &str, wire_key: &str) -> Self {
        Self::new(name, FieldKind::Timestamp, wire_key)
    }
}

/// Schema of one record type.
///
/// `fields` keeps declaration order. The canonical wire order is the fields
/// sorted by wire key (byte-wise ascending), fixed when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSpec>,
    wire_order: Vec<usize>,
}

impl RecordSchema {
    /// Start defining a record schema
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Record type identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields in canonical wire order
    pub fn wire_order(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.wire_order.iter().map(move |&i| &self.fields[i])
    }

    /// Get field by wire key
    pub fn field(&self, wire_key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.wire_key == wire_key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RecordSchema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Add a field
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate the definition and fix the wire order
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.wire_key.is_empty() {
                return Err(SchemaError::EmptyWireKey {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.wire_key.as_str()) {
                return Err(SchemaError::DuplicateWireKey {
                    record: self.name.clone(),
                    wire_key: field.wire_key.clone(),
                });
            }
            if let FieldKind::Enum(def) = &field.kind {
                def.check()?;
            }
        }

        let mut wire_order: Vec<usize> = (0..self.fields.len()).collect();
        wire_order.sort_by(|&a, &b| {
            self.fields[a]
                .wire_key
                .as_bytes()
                .cmp(self.fields[b].wire_key.as_bytes())
        });

        Ok(RecordSchema {
            name: self.name,
            fields: self.fields,
            wire_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> EnumDef {
        EnumDef::new("Color").variant("White", 0).variant("Black", 1)
    }

    #[test]
    fn test_wire_order_sorted_by_key() {
        let schema = RecordSchema::builder("sample")
            .field(FieldSpec::integer("Zeta", "z"))
            .field(FieldSpec::boolean("Alpha", "a"))
            .field(FieldSpec::text("Mid", "m"))
            .build()
            .unwrap();

        let keys: Vec<&str> = schema.wire_order().map(|f| f.wire_key.as_str()).collect();
        assert_eq!(keys, ["a", "m", "z"]);

        let declared: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(declared, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_wire_order_is_bytewise() {
        let schema = RecordSchema::builder("case")
            .field(FieldSpec::integer("lower", "b"))
            .field(FieldSpec::integer("upper", "B"))
            .field(FieldSpec::integer("under", "_"))
            .build()
            .unwrap();
        let keys: Vec<&str> = schema.wire_order().map(|f| f.wire_key.as_str()).collect();
        assert_eq!(keys, ["B", "_", "b"]);
    }

    #[test]
    fn test_duplicate_wire_key() {
        let err = RecordSchema::builder("dup")
            .field(FieldSpec::integer("A", "k"))
            .field(FieldSpec::text("B", "k"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateWireKey {
                record: "dup".into(),
                wire_key: "k".into()
            }
        );
    }

    #[test]
    fn test_empty_wire_key() {
        let err = RecordSchema::builder("r")
            .field(FieldSpec::integer("A", ""))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyWireKey { .. }));
    }

    #[test]
    fn test_enum_definition_checks() {
        let empty = RecordSchema::builder("r")
            .field(FieldSpec::enumeration("E", EnumDef::new("Nothing"), "e"))
            .build();
        assert_eq!(empty.unwrap_err(), SchemaError::EmptyEnum("Nothing".into()));

        let dup = EnumDef::new("Twice").variant("A", 1).variant("B", 1);
        let err = RecordSchema::builder("r")
            .field(FieldSpec::enumeration("E", dup, "e"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEnumTag { tag: 1, .. }));
    }

    #[test]
    fn test_enum_lookup() {
        let def = color();
        assert!(def.is_valid(1));
        assert!(!def.is_valid(99));
        assert_eq!(def.variant_name(0), Some("White"));
        assert_eq!(def.tag_of("Black"), Some(1));
        assert_eq!(def.tag_of("Red"), None);
    }

    #[test]
    fn test_field_lookup() {
        let schema = RecordSchema::builder("r")
            .field(FieldSpec::integer("Id", "id"))
            .field(FieldSpec::boolean("Flag", "flag"))
            .field(FieldSpec::bytes("Key", "key"))
            .field(FieldSpec::enumeration("Side", color(), "side"))
            .build()
            .unwrap();

        assert_eq!(schema.len(), 4);
        assert_eq!(schema.field("flag").map(|f| f.name.as_str()), Some("Flag"));
        assert!(schema.field("Flag").is_none());
    }
}
