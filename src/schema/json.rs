//! Schema-directed conversion between records and JSON
//!
//! Bytes are lowercase hex strings. Enums are written as their variant name
//! and read from either a variant name or an integer tag.

use serde_json::{Map, Value as Json};

use super::codec::{CodecError, CodecResult};
use super::types::{FieldKind, FieldSpec, RecordSchema};
use super::value::{RecordValue, Value};

/// Render a record as a JSON object keyed by wire key
pub fn to_json(schema: &RecordSchema, record: &RecordValue) -> CodecResult<Json> {
    if let Some(extra) = record.keys().find(|k| schema.field(k).is_none()) {
        return Err(CodecError::mismatch(
            extra,
            format!("not declared in record '{}'", schema.name()),
        ));
    }

    let mut obj = Map::new();
    for field in schema.wire_order() {
        let value = record
            .get(&field.wire_key)
            .ok_or_else(|| CodecError::mismatch(&field.wire_key, "missing field"))?;
        obj.insert(field.wire_key.clone(), value_to_json(field, value)?);
    }
    Ok(Json::Object(obj))
}

fn value_to_json(field: &FieldSpec, value: &Value) -> CodecResult<Json> {
    Ok(match (value, &field.kind) {
        (Value::Integer(v), FieldKind::Integer64) | (Value::Timestamp(v), FieldKind::Timestamp) => {
            Json::from(*v)
        }
        (Value::Boolean(v), FieldKind::Boolean) => Json::Bool(*v),
        (Value::Bytes(v), FieldKind::Bytes) => Json::String(hex::encode(v)),
        (Value::Text(v), FieldKind::Text) => Json::String(v.clone()),
        (Value::Enum(tag), FieldKind::Enum(def)) => match def.variant_name(*tag) {
            Some(name) => Json::String(name.to_string()),
            None => {
                return Err(CodecError::UnknownEnumTag {
                    field: field.wire_key.clone(),
                    tag: *tag,
                })
            }
        },
        (v, kind) => {
            return Err(CodecError::mismatch(
                &field.wire_key,
                format!("expected {}, got {}", kind.type_name(), v.type_name()),
            ))
        }
    })
}

/// Build a record from a JSON object keyed by wire key.
///
/// Keys not declared by the schema are rejected.
pub fn from_json(schema: &RecordSchema, json: &Json) -> CodecResult<RecordValue> {
    let obj = json
        .as_object()
        .ok_or_else(|| CodecError::mismatch(schema.name(), "expected a JSON object"))?;

    if let Some(extra) = obj.keys().find(|k| schema.field(k).is_none()) {
        return Err(CodecError::mismatch(
            extra,
            format!("not declared in record '{}'", schema.name()),
        ));
    }

    let mut record = RecordValue::new();
    for field in schema.fields() {
        let raw = obj
            .get(&field.wire_key)
            .ok_or_else(|| CodecError::mismatch(&field.wire_key, "missing field"))?;
        record.insert(&field.wire_key, value_from_json(field, raw)?);
    }
    Ok(record)
}

fn value_from_json(field: &FieldSpec, raw: &Json) -> CodecResult<Value> {
    let wrong = || {
        CodecError::mismatch(
            &field.wire_key,
            format!("expected {}, got JSON {}", field.kind.type_name(), raw),
        )
    };

    Ok(match &field.kind {
        FieldKind::Integer64 => Value::Integer(raw.as_i64().ok_or_else(wrong)?),
        FieldKind::Timestamp => Value::Timestamp(raw.as_i64().ok_or_else(wrong)?),
        FieldKind::Boolean => Value::Boolean(raw.as_bool().ok_or_else(wrong)?),
        FieldKind::Text => Value::Text(raw.as_str().ok_or_else(wrong)?.to_string()),
        FieldKind::Bytes => {
            let s = raw.as_str().ok_or_else(wrong)?;
            Value::Bytes(hex::decode(s).map_err(|e| {
                CodecError::mismatch(&field.wire_key, format!("invalid hex: {e}"))
            })?)
        }
        FieldKind::Enum(def) => {
            let tag = match raw {
                Json::String(name) => def.tag_of(name).ok_or_else(|| {
                    CodecError::mismatch(
                        &field.wire_key,
                        format!("'{}' is not a variant of {}", name, def.name),
                    )
                })?,
                _ => raw.as_i64().ok_or_else(wrong)?,
            };
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
