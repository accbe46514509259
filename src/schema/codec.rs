//! Primitive Codec - Cursor-Based Binary IO
//!
//! Low-level building blocks for the record codec:
//!
//! - Cursor contexts over borrowed buffers (zero-copy reads)
//! - Configurable endianness
//! - Length-prefixed variable-size values with a decode-side size limit
//! - Type-safe encode/decode trait for the scalar wire types

use std::fmt;
use thiserror::Error;

// ============================================================================
// Endianness
// ============================================================================

/// Byte order for multi-byte values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Big-endian (network byte order)
    #[default]
    Big,
    /// Little-endian
    Little,
    /// Native endianness of the platform
    Native,
}

impl Endian {
    /// Check if this is effectively little-endian on the current platform
    #[inline]
    pub fn is_little(self) -> bool {
        match self {
            Endian::Big => false,
            Endian::Little => true,
            Endian::Native => cfg!(target_endian = "little"),
        }
    }

    /// Check if this is effectively big-endian on the current platform
    #[inline]
    pub fn is_big(self) -> bool {
        !self.is_little()
    }
}

/// Byte order of the canonical record encoding
pub const WIRE_ENDIAN: Endian = Endian::Big;

/// Width in bytes of the length prefix in front of bytes and text values
pub const LENGTH_PREFIX_SIZE: usize = 4;

// ============================================================================
// Codec Errors
// ============================================================================

/// Errors that can occur during encoding/decoding.
///
/// Primitive decoders do not know which field they are reading, so they leave
/// `field` empty; the record codec fills it in via [`CodecError::in_field`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Value does not conform to the record schema
    #[error("schema mismatch on field '{field}': {reason}")]
    SchemaMismatch { field: String, reason: String },

    /// Input ended in the middle of a field
    #[error("truncated data: need {needed} bytes, have {available}")]
    TruncatedData { needed: usize, available: usize },

    /// Enum tag is not one of the declared variants
    #[error("unknown enum tag {tag} for field '{field}'")]
    UnknownEnumTag { field: String, tag: i64 },

    /// Bytes remain after the last field
    #[error("trailing data: {remaining} unconsumed bytes")]
    TrailingData { remaining: usize },

    /// Boolean byte is neither 0x00 nor 0x01
    #[error("invalid boolean encoding for field '{field}': 0x{byte:02x}")]
    InvalidBooleanEncoding { field: String, byte: u8 },

    /// Text payload is not valid UTF-8
    #[error("invalid UTF-8 in text field '{field}'")]
    InvalidUtf8 { field: String },

    /// Length prefix exceeds the configured maximum
    #[error("length {len} of field '{field}' exceeds limit {max}")]
    LengthLimitExceeded { field: String, len: usize, max: usize },

    /// Buffer does not have enough space for encoding
    #[error("buffer overflow: need {needed} bytes, have {available}")]
    BufferOverflow { needed: usize, available: usize },
}

impl CodecError {
    /// Attach a field name to errors raised below the record level
    pub fn in_field(self, name: &str) -> Self {
        match self {
            CodecError::InvalidBooleanEncoding { field, byte } if field.is_empty() => {
                CodecError::InvalidBooleanEncoding {
                    field: name.to_string(),
                    byte,
                }
            }
            CodecError::InvalidUtf8 { field } if field.is_empty() => CodecError::InvalidUtf8 {
                field: name.to_string(),
            },
            CodecError::LengthLimitExceeded { field, len, max } if field.is_empty() => {
                CodecError::LengthLimitExceeded {
                    field: name.to_string(),
                    len,
                    max,
                }
            }
            other => other,
        }
    }

    /// Shorthand for a schema mismatch on `field`
    pub fn mismatch(field: &str, reason: impl Into<String>) -> Self {
        CodecError::SchemaMismatch {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

// ============================================================================
// Encode Context
// ============================================================================

/// Context for encoding operations
///
/// Provides a mutable buffer and cursor. The buffer is expected to be sized
/// up front; writing past its end is an error, never a reallocation.
pub struct EncodeContext<'a> {
    /// Mutable buffer to write into
    buffer: &'a mut [u8],
    /// Current byte position in buffer
    cursor: usize,
    /// Byte order for multi-byte values
    endianness: Endian,
}

impl<'a> EncodeContext<'a> {
    /// Create a new encode context using the wire byte order
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_endian(buffer, WIRE_ENDIAN)
    }

    /// Create a new encode context with specified endianness
    pub fn with_endian(buffer: &'a mut [u8], endianness: Endian) -> Self {
        Self {
            buffer,
            cursor: 0,
            endianness,
        }
    }

    /// Get current cursor position (bytes written)
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Get remaining capacity in bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    /// Get the endianness setting
    #[inline]
    pub fn endianness(&self) -> Endian {
        self.endianness
    }

    /// Write raw bytes to the buffer
    pub fn write_bytes(&mut self, data: &[u8]) -> CodecResult<usize> {
        let len = data.len();
        if self.remaining() < len {
            return Err(CodecError::BufferOverflow {
                needed: len,
                available: self.remaining(),
            });
        }

        self.buffer[self.cursor..self.cursor + len].copy_from_slice(data);
        self.cursor += len;
        Ok(len)
    }

    /// Write a single byte
    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> CodecResult<usize> {
        self.write_bytes(&[byte])
    }
}

impl fmt::Debug for EncodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeContext")
            .field("cursor", &self.cursor)
            .field("endianness", &self.endianness)
            .field("remaining", &self.remaining())
            .finish()
    }
}

// ============================================================================
// Decode Context
// ============================================================================

/// Context for decoding operations
///
/// Provides an immutable buffer and cursor for zero-copy deserialization.
pub struct DecodeContext<'a> {
    /// Immutable buffer to read from
    buffer: &'a [u8],
    /// Current byte position in buffer
    cursor: usize,
    /// Byte order for multi-byte values
    endianness: Endian,
    /// Largest accepted length prefix
    max_len: usize,
}

impl<'a> DecodeContext<'a> {
    /// Create a new decode context using the wire byte order and no length limit
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_endian(buffer, WIRE_ENDIAN)
    }

    /// Create a new decode context with specified endianness
    pub fn with_endian(buffer: &'a [u8], endianness: Endian) -> Self {
        Self {
            buffer,
            cursor: 0,
            endianness,
            max_len: u32::MAX as usize,
        }
    }

    /// Cap the length prefix accepted by variable-size values
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Get current cursor position (bytes read)
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Get remaining bytes to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    /// Get the endianness setting
    #[inline]
    pub fn endianness(&self) -> Endian {
        self.endianness
    }

    /// Largest accepted length prefix
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Read raw bytes from the buffer (zero-copy slice)
    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::TruncatedData {
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.buffer[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.read_bytes(N)?);
        Ok(arr)
    }

    /// Read a single byte
    #[inline]
    pub fn read_byte(&mut self) -> CodecResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Read a length prefix and check it against the limit
    pub fn read_len(&mut self) -> CodecResult<usize> {
        let len = u32::decode(self)? as usize;
        if len > self.max_len {
            return Err(CodecError::LengthLimitExceeded {
                field: String::new(),
                len,
                max: self.max_len,
            });
        }
        Ok(len)
    }
}

impl fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("cursor", &self.cursor)
            .field("endianness", &self.endianness)
            .field("remaining", &self.remaining())
            .field("max_len", &self.max_len)
            .finish()
    }
}

// ============================================================================
// Codec Trait
// ============================================================================

/// Trait for types that can be encoded to and decoded from binary
pub trait Codec: Sized {
    /// Encode this value into the context buffer
    ///
    /// Returns the number of bytes written on success.
    fn encode(&self, ctx: &mut EncodeContext) -> CodecResult<usize>;

    /// Decode a value from the context buffer
    fn decode(ctx: &mut DecodeContext) -> CodecResult<Self>;

    /// Get the encoded size of this value
    fn encoded_size(&self) -> usize;
}

// ============================================================================
// Primitive Type Implementations
// ============================================================================

macro_rules! impl_codec_int {
    ($ty:ty, $size:expr) => {
        impl Codec for $ty {
            fn encode(&self, ctx: &mut EncodeContext) -> CodecResult<usize> {
                let bytes = if ctx.endianness().is_little() {
                    self.to_le_bytes()
                } else {
                    self.to_be_bytes()
                };
                ctx.write_bytes(&bytes)
            }

            fn decode(ctx: &mut DecodeContext) -> CodecResult<Self> {
                let arr = ctx.read_array::<{ $size }>()?;
                Ok(if ctx.endianness().is_little() {
                    Self::from_le_bytes(arr)
                } else {
                    Self::from_be_bytes(arr)
                })
            }

            fn encoded_size(&self) -> usize {
                $size
            }
        }
    };
}

impl_codec_int!(u32, 4);
impl_codec_int!(i64, 8);

// Boolean
impl Codec for bool {
    fn encode(&self, ctx: &mut EncodeContext) -> CodecResult<usize> {
        ctx.write_byte(u8::from(*self))
    }

    fn decode(ctx: &mut DecodeContext) -> CodecResult<Self> {
        match ctx.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidBooleanEncoding {
                field: String::new(),
                byte,
            }),
        }
    }

    fn encoded_size(&self) -> usize {
        1
    }
}

// ============================================================================
// Variable-Length Types
// ============================================================================

fn encode_len(len: usize, ctx: &mut EncodeContext) -> CodecResult<usize> {
    let len = u32::try_from(len).map_err(|_| CodecError::LengthLimitExceeded {
        field: String::new(),
        len,
        max: u32::MAX as usize,
    })?;
    len.encode(ctx)
}

/// Vec<u8> with u32 length prefix
impl Codec for Vec<u8> {
    fn encode(&self, ctx: &mut EncodeContext) -> CodecResult<usize> {
        let mut written = encode_len(self.len(), ctx)?;
        written += ctx.write_bytes(self)?;
        Ok(written)
    }

    fn decode(ctx: &mut DecodeContext) -> CodecResult<Self> {
        let len = ctx.read_len()?;
        Ok(ctx.read_bytes(len)?.to_vec())
    }

    fn encoded_size(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.len()
    }
}

/// String with u32 length prefix (UTF-8)
impl Codec for String {
    fn encode(&self, ctx: &mut EncodeContext) -> CodecResult<usize> {
        let mut written = encode_len(self.len(), ctx)?;
        written += ctx.write_bytes(self.as_bytes())?;
        Ok(written)
    }

    fn decode(ctx: &mut DecodeContext) -> CodecResult<Self> {
        let len = ctx.read_len()?;
        let bytes = ctx.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 {
                field: String::new(),
            })
    }

    fn encoded_size(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
