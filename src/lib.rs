//! Chess Ledger Records - canonical encoding of game state records
//!
//! The game client exchanges flat records with the ledger:
//! - Each record type is described by a static schema (wire key + type per field)
//! - Records encode to one deterministic byte layout, big-endian, keyed by wire key
//! - Decoding is strict: truncation, unknown enum tags and trailing bytes all fail
//! - Typed views (`GameData`, `TimeoutData`) sit on top of the generic record value

pub mod config;
pub mod records;
pub mod schema;

pub use config::{CodecConfig, ConfigError};

// Re-export record types
pub use records::{GameData, GameType, LedgerRecord, PubKey, RecordError, TimeoutData};

// Re-export schema types
pub use schema::{
    // Type system
    EnumDef, FieldKind, FieldSpec, RecordSchema, SchemaError,
    // Values
    RecordValue, Value,
    // Codec
    CodecError, CodecResult, SchemaCodec,
    // Lookup
    SchemaRegistry,
};
