//! Records exchanged with the ledger
//!
//! Typed views over the generic [`RecordValue`]: each record type declares
//! its schema once and converts to and from the wire representation.

pub mod game;
pub mod pubkey;
pub mod timeout;

pub use game::{GameData, GameType};
pub use pubkey::PubKey;
pub use timeout::TimeoutData;

use thiserror::Error;

use crate::schema::{
    CodecError, CodecResult, RecordSchema, RecordValue, SchemaCodec, SchemaError, SchemaRegistry,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("unknown record type '{0}'")]
    UnknownRecord(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A record type with a fixed schema
pub trait LedgerRecord: Sized {
    /// Identifier the schema is registered under
    const RECORD_ID: &'static str;

    /// Build the schema of this record type
    fn schema() -> Result<RecordSchema, SchemaError>;

    fn to_record(&self) -> RecordValue;

    fn from_record(record: &RecordValue) -> CodecResult<Self>;

    /// Encode using the schema registered for this record type
    fn encode(
        &self,
        codec: &SchemaCodec,
        registry: &SchemaRegistry,
    ) -> Result<Vec<u8>, RecordError> {
        let schema = schema_for(registry, Self::RECORD_ID)?;
        Ok(codec.encode(schema, &self.to_record())?)
    }

    /// Decode using the schema registered for this record type
    fn decode(
        bytes: &[u8],
        codec: &SchemaCodec,
        registry: &SchemaRegistry,
    ) -> Result<Self, RecordError> {
        let schema = schema_for(registry, Self::RECORD_ID)?;
        let record = codec.decode(schema, bytes)?;
        Ok(Self::from_record(&record)?)
    }
}

/// Look up a schema, failing with [`RecordError::UnknownRecord`]
pub fn schema_for<'a>(
    registry: &'a SchemaRegistry,
    record_id: &str,
) -> Result<&'a RecordSchema, RecordError> {
    registry
        .get(record_id)
        .ok_or_else(|| RecordError::UnknownRecord(record_id.to_string()))
}

impl SchemaRegistry {
    /// Registry holding every record type of the game client
    pub fn standard() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register(GameData::schema()?)?;
        registry.register(TimeoutData::schema()?)?;
        Ok(registry)
    }
}

/// Read a required field through one of the typed getters of [`RecordValue`]
pub(crate) fn required<'a, T>(
    record: &'a RecordValue,
    wire_key: &str,
    get: impl Fn(&'a RecordValue, &str) -> Option<T>,
) -> CodecResult<T> {
    get(record, wire_key)
        .ok_or_else(|| CodecError::mismatch(wire_key, "missing or wrong type"))
}
