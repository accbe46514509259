//! Schema-driven record codec
//!
//! Canonical layout of a record: its fields back to back, sorted by wire key
//! (byte-wise ascending), with no header and no separators.
//!
//! | Kind      | Encoding                                  |
//! |-----------|-------------------------------------------|
//! | Integer64 | 8 bytes, two's complement, big-endian     |
//! | Boolean   | 1 byte, `0x00` or `0x01`                  |
//! | Bytes     | u32 big-endian length, then the bytes     |
//! | Text      | u32 big-endian length, then UTF-8 bytes   |
//! | Enum      | tag as Integer64                          |
//! | Timestamp | as Integer64, value passed through as is  |
//!
//! Decoding is strict: every byte must belong to a field.

use tracing::debug;

use super::codec::{Codec, CodecError, CodecResult, DecodeContext, EncodeContext};
use super::types::{FieldKind, FieldSpec, RecordSchema};
use super::value::{RecordValue, Value};
use crate::config::CodecConfig;

/// Encodes and decodes records against their schema.
///
/// Stateless apart from its configuration; share freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaCodec {
    config: CodecConfig,
}

impl SchemaCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `value` in canonical order
    pub fn encode(&self, schema: &RecordSchema, value: &RecordValue) -> CodecResult<Vec<u8>> {
        let len = self.encoded_len(schema, value)?;
        let mut buf = vec![0u8; len];
        let mut ctx = EncodeContext::new(&mut buf);

        for field in schema.wire_order() {
            // Presence was checked by encoded_len
            if let Some(v) = value.get(&field.wire_key) {
                encode_value(v, &mut ctx).map_err(|e| e.in_field(&field.wire_key))?;
            }
        }

        debug_assert_eq!(ctx.position(), len);
        debug!(record = schema.name(), bytes = len, "encoded record");
        Ok(buf)
    }

    /// Decode a record, consuming exactly all of `bytes`
    pub fn decode(&self, schema: &RecordSchema, bytes: &[u8]) -> CodecResult<RecordValue> {
        let result = self.decode_fields(schema, bytes);
        if let Err(e) = &result {
            debug!(
                record = schema.name(),
                bytes = bytes.len(),
                error = %e,
                "failed to decode record"
            );
        }
        result
    }

    fn decode_fields(&self, schema: &RecordSchema, bytes: &[u8]) -> CodecResult<RecordValue> {
        let mut ctx = DecodeContext::new(bytes).with_max_len(self.config.max_field_len);
        let mut record = RecordValue::new();

        for field in schema.wire_order() {
            let value = decode_value(field, &mut ctx).map_err(|e| e.in_field(&field.wire_key))?;
            record.insert(&field.wire_key, value);
        }

        if ctx.remaining() > 0 {
            return Err(CodecError::TrailingData {
                remaining: ctx.remaining(),
            });
        }

        debug!(record = schema.name(), bytes = bytes.len(), "decoded record");
        Ok(record)
    }

    /// Exact length `encode` would produce, after checking conformance
    pub fn encoded_len(&self, schema: &RecordSchema, value: &RecordValue) -> CodecResult<usize> {
        self.check_conforms(schema, value)?;
        Ok(schema
            .fields()
            .iter()
            .filter_map(|f| value.get(&f.wire_key))
            .map(value_size)
            .sum())
    }

    /// Check that `value` holds exactly the fields of `schema` with matching types
    pub fn check_conforms(&self, schema: &RecordSchema, value: &RecordValue) -> CodecResult<()> {
        for field in schema.fields() {
            let v = value
                .get(&field.wire_key)
                .ok_or_else(|| CodecError::mismatch(&field.wire_key, "missing field"))?;

            if !v.matches(&field.kind) {
                return Err(CodecError::mismatch(
                    &field.wire_key,
                    format!("expected {}, got {}", field.kind.type_name(), v.type_name()),
                ));
            }

            match (v, &field.kind) {
                (Value::Enum(tag), FieldKind::Enum(def)) if !def.is_valid(*tag) => {
                    return Err(CodecError::UnknownEnumTag {
                        field: field.wire_key.clone(),
                        tag: *tag,
                    });
                }
                (Value::Bytes(b), _) => self.check_len(&field.wire_key, b.len())?,
                (Value::Text(s), _) => self.check_len(&field.wire_key, s.len())?,
                _ => {}
            }
        }

        if let Some(extra) = value.keys().find(|k| schema.field(k).is_none()) {
            return Err(CodecError::mismatch(
                extra,
                format!("not declared in record '{}'", schema.name()),
            ));
        }

        Ok(())
    }

    fn check_len(&self, field: &str, len: usize) -> CodecResult<()> {
        if len > self.config.max_field_len {
            return Err(CodecError::LengthLimitExceeded {
                field: field.to_string(),
                len,
                max: self.config.max_field_len,
            });
        }
        Ok(())
    }
}

fn value_size(value: &Value) -> usize {
    match value {
        Value::Integer(v) | Value::Enum(v) | Value::Timestamp(v) => v.encoded_size(),
        Value::Boolean(v) => v.encoded_size(),
        Value::Bytes(v) => v.encoded_size(),
        Value::Text(v) => v.encoded_size(),
    }
}

fn encode_value(value: &Value, ctx: &mut EncodeContext) -> CodecResult<usize> {
    match value {
        Value::Integer(v) | Value::Enum(v) | Value::Timestamp(v) => v.encode(ctx),
        Value::Boolean(v) => v.encode(ctx),
        Value::Bytes(v) => v.encode(ctx),
        Value::Text(v) => v.encode(ctx),
    }
}

fn decode_value(field: &FieldSpec, ctx: &mut DecodeContext) -> CodecResult<Value> {
    Ok(match &field.kind {
        FieldKind::Integer64 => Value::Integer(i64::decode(ctx)?),
        FieldKind::Boolean => Value::Boolean(bool::decode(ctx)?),
        FieldKind::Bytes => Value::Bytes(Vec::<u8>::decode(ctx)?),
        FieldKind::Text => Value::Text(String::decode(ctx)?),
        FieldKind::Timestamp => Value::Timestamp(i64::decode(ctx)?),
        FieldKind::Enum(def) => {
            let tag = i64::decode(ctx)?;
            if !def.is_valid(tag) {
                return Err(CodecError::UnknownEnumTag {
                    field: field.wire_key.clone(),
                    tag,
                });
            }
            Value::Enum(tag)
        }
    })
}

/// Encode with the default configuration
pub fn encode(schema: &RecordSchema, value: &RecordValue) -> CodecResult<Vec<u8>> {
    SchemaCodec::default().encode(schema, value)
}

/// Decode with the default configuration
pub fn decode(schema: &RecordSchema, bytes: &[u8]) -> CodecResult<RecordValue> {
    SchemaCodec::default().decode(schema, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::EnumDef;
    use proptest::prelude::*;

    fn piece() -> EnumDef {
        EnumDef::new("Piece")
            .variant("Pawn", 0)
            .variant("Knight", 1)
            .variant("Bishop", 2)
    }

    fn mixed_schema() -> RecordSchema {
        RecordSchema::builder("mixed")
            .field(FieldSpec::integer("Id", "id"))
            .field(FieldSpec::boolean("Flag", "flag"))
            .field(FieldSpec::bytes("Key", "key"))
            .field(FieldSpec::text("Name", "name"))
            .field(FieldSpec::enumeration("Piece", piece(), "piece"))
            .field(FieldSpec::timestamp("At", "at"))
            .build()
            .unwrap()
    }

    fn mixed_value() -> RecordValue {
        RecordValue::new()
            .with("id", Value::Integer(-5))
            .with("flag", Value::Boolean(true))
            .with("key", Value::Bytes(vec![0xDE, 0xAD]))
            .with("name", Value::Text("knightrider".into()))
            .with("piece", Value::Enum(2))
            .with("at", Value::Timestamp(1_700_000_000_123))
    }

    #[test]
    fn test_single_integer_field() {
        let schema = RecordSchema::builder("row")
            .field(FieldSpec::integer("GameRowid", "game_rowid"))
            .build()
            .unwrap();
        let value = RecordValue::new().with("game_rowid", Value::Integer(42));

        let bytes = encode(&schema, &value).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 42]);
        assert_eq!(decode(&schema, &bytes).unwrap().integer("game_rowid"), Some(42));
    }

    #[test]
    fn test_boolean_bytes() {
        let schema = RecordSchema::builder("b")
            .field(FieldSpec::boolean("Flag", "flag"))
            .build()
            .unwrap();

        let on = RecordValue::new().with("flag", Value::Boolean(true));
        let off = RecordValue::new().with("flag", Value::Boolean(false));
        assert_eq!(encode(&schema, &on).unwrap(), [0x01]);
        assert_eq!(encode(&schema, &off).unwrap(), [0x00]);

        assert_eq!(
            decode(&schema, &[0x02]),
            Err(CodecError::InvalidBooleanEncoding {
                field: "flag".into(),
                byte: 0x02
            })
        );
    }

    #[test]
    fn test_canonical_layout() {
        let bytes = encode(&mixed_schema(), &mixed_value()).unwrap();

        let mut expected = Vec::new();
        // at
        expected.extend_from_slice(&1_700_000_000_123i64.to_be_bytes());
        // flag
        expected.push(1);
        // id
        expected.extend_from_slice(&(-5i64).to_be_bytes());
        // key
        expected.extend_from_slice(&[0, 0, 0, 2, 0xDE, 0xAD]);
        // name
        expected.extend_from_slice(&[0, 0, 0, 11]);
        expected.extend_from_slice(b"knightrider");
        // piece
        expected.extend_from_slice(&2i64.to_be_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_declaration_order_does_not_change_bytes() {
        let reversed = RecordSchema::builder("mixed")
            .field(FieldSpec::timestamp("At", "at"))
            .field(FieldSpec::enumeration("Piece", piece(), "piece"))
            .field(FieldSpec::text("Name", "name"))
            .field(FieldSpec::bytes("Key", "key"))
            .field(FieldSpec::boolean("Flag", "flag"))
            .field(FieldSpec::integer("Id", "id"))
            .build()
            .unwrap();

        assert_eq!(
            encode(&mixed_schema(), &mixed_value()).unwrap(),
            encode(&reversed, &mixed_value()).unwrap()
        );
    }

    #[test]
    fn test_roundtrip() {
        let schema = mixed_schema();
        let value = mixed_value();
        let bytes = encode(&schema, &value).unwrap();
        assert_eq!(bytes.len(), SchemaCodec::default().encoded_len(&schema, &value).unwrap());
        assert_eq!(decode(&schema, &bytes).unwrap(), value);
    }

    #[test]
    fn test_every_prefix_is_truncated() {
        let schema = mixed_schema();
        let bytes = encode(&schema, &mixed_value()).unwrap();
        for k in 0..bytes.len() {
            assert!(
                matches!(decode(&schema, &bytes[..k]), Err(CodecError::TruncatedData { .. })),
                "prefix of length {k} was not reported as truncated"
            );
        }
    }

    #[test]
    fn test_trailing_byte_rejected() {
        let schema = mixed_schema();
        let mut bytes = encode(&schema, &mixed_value()).unwrap();
        bytes.push(0);
        assert_eq!(
            decode(&schema, &bytes),
            Err(CodecError::TrailingData { remaining: 1 })
        );
    }

    #[test]
    fn test_unknown_enum_tag_on_decode() {
        let schema = RecordSchema::builder("e")
            .field(FieldSpec::enumeration("Piece", piece(), "piece"))
            .build()
            .unwrap();
        assert_eq!(
            decode(&schema, &99i64.to_be_bytes()),
            Err(CodecError::UnknownEnumTag {
                field: "piece".into(),
                tag: 99
            })
        );
    }

    #[test]
    fn test_unknown_enum_tag_on_encode() {
        let mut value = mixed_value();
        value.insert("piece", Value::Enum(99));
        assert_eq!(
            encode(&mixed_schema(), &value),
            Err(CodecError::UnknownEnumTag {
                field: "piece".into(),
                tag: 99
            })
        );
    }

    #[test]
    fn test_missing_field() {
        let value: RecordValue = mixed_value()
            .iter()
            .filter(|(k, _)| *k != "name")
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        assert_eq!(
            encode(&mixed_schema(), &value),
            Err(CodecError::mismatch("name", "missing field"))
        );
    }

    #[test]
    fn test_type_mismatch() {
        let mut value = mixed_value();
        value.insert("at", Value::Integer(1));
        assert_eq!(
            encode(&mixed_schema(), &value),
            Err(CodecError::mismatch("at", "expected timestamp, got integer"))
        );
    }

    #[test]
    fn test_extra_field() {
        let value = mixed_value().with("bonus", Value::Boolean(false));
        assert!(matches!(
            encode(&mixed_schema(), &value),
            Err(CodecError::SchemaMismatch { field, .. }) if field == "bonus"
        ));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let schema = RecordSchema::builder("t")
            .field(FieldSpec::text("Name", "name"))
            .build()
            .unwrap();
        assert_eq!(
            decode(&schema, &[0, 0, 0, 1, 0xFF]),
            Err(CodecError::InvalidUtf8 {
                field: "name".into()
            })
        );
    }

    #[test]
    fn test_length_limit_applies_both_ways() {
        let schema = RecordSchema::builder("k")
            .field(FieldSpec::bytes("Key", "key"))
            .build()
            .unwrap();
        let codec = SchemaCodec::new(CodecConfig { max_field_len: 4 });

        let big = RecordValue::new().with("key", Value::Bytes(vec![0; 5]));
        assert_eq!(
            codec.encode(&schema, &big),
            Err(CodecError::LengthLimitExceeded {
                field: "key".into(),
                len: 5,
                max: 4
            })
        );

        let bytes = encode(&schema, &big).unwrap();
        assert_eq!(
            codec.decode(&schema, &bytes),
            Err(CodecError::LengthLimitExceeded {
                field: "key".into(),
                len: 5,
                max: 4
            })
        );
    }

    #[test]
    fn test_empty_schema() {
        let schema = RecordSchema::builder("empty").build().unwrap();
        assert!(encode(&schema, &RecordValue::new()).unwrap().is_empty());
        assert!(decode(&schema, &[]).unwrap().is_empty());
        assert_eq!(
            decode(&schema, &[7]),
            Err(CodecError::TrailingData { remaining: 1 })
        );
    }

    fn arb_value() -> impl Strategy<Value = RecordValue> {
        (
            any::<i64>(),
            any::<bool>(),
            proptest::collection::vec(any::<u8>(), 0..64),
            ".{0,24}",
            0i64..3,
            any::<i64>(),
        )
            .prop_map(|(id, flag, key, name, piece, at)| {
                RecordValue::new()
                    .with("id", Value::Integer(id))
                    .with("flag", Value::Boolean(flag))
                    .with("key", Value::Bytes(key))
                    .with("name", Value::Text(name))
                    .with("piece", Value::Enum(piece))
                    .with("at", Value::Timestamp(at))
            })
    }

    proptest! {
        #[test]
        fn prop_roundtrip(value in arb_value()) {
            let schema = mixed_schema();
            let bytes = encode(&schema, &value).unwrap();
            prop_assert_eq!(decode(&schema, &bytes).unwrap(), value);
        }

        #[test]
        fn prop_prefix_truncated(value in arb_value(), cut in any::<prop::sample::Index>()) {
            let schema = mixed_schema();
            let bytes = encode(&schema, &value).unwrap();
            let k = cut.index(bytes.len());
            let truncated = matches!(
                decode(&schema, &bytes[..k]),
                Err(CodecError::TruncatedData { .. })
            );
            prop_assert!(truncated);
        }

        #[test]
        fn prop_trailing_rejected(value in arb_value(), extra in any::<u8>()) {
            let schema = mixed_schema();
            let mut bytes = encode(&schema, &value).unwrap();
            bytes.push(extra);
            prop_assert_eq!(
                decode(&schema, &bytes),
                Err(CodecError::TrailingData { remaining: 1 })
            );
        }
    }
}
