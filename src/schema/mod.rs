//! Schema Module - Record Definitions and Canonical Encoding
//!
//! Records exchanged with the ledger are described by static schemas
//! instead of attributes on types:
//!
//! 1. **Schema Definition** - named fields bound to wire keys and wire types
//! 2. **Record Values** - wire key to typed value, checked against a schema
//! 3. **Canonical Codec** - one deterministic byte layout per schema
//! 4. **Registry** - record-type id to schema lookup for the transport
//! 5. **JSON Bridge** - human-readable form for tooling and logs

pub mod codec;
pub mod json;
pub mod record_codec;
pub mod registry;
pub mod types;
pub mod value;

pub use codec::{Codec, CodecError, CodecResult, DecodeContext, EncodeContext, Endian, WIRE_ENDIAN};
pub use json::{from_json, to_json};
pub use record_codec::{decode, encode, SchemaCodec};
pub use registry::SchemaRegistry;
pub use types::{EnumDef, FieldKind, FieldSpec, RecordSchema, SchemaBuilder, SchemaError};
pub use value::{RecordValue, Value};
