//! Fixed-size scalar types and the table that resolves their symbolic tags.
//!
//! All multi-byte primitives are little-endian.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::cursor::ReadCursor;
use crate::error::Result;
use crate::value::Value;

/// Decodes exactly `size` bytes into a value
pub type DecodeFn = fn(&[u8]) -> Value;

/// A resolved primitive: its tag, width in bytes, and decode function
#[derive(Clone, Copy)]
pub struct PrimitiveType {
    pub tag: &'static str,
    pub size: usize,
    pub decode: DecodeFn,
}

impl PrimitiveType {
    /// Read this primitive at the cursor and advance past it
    pub fn read(&self, cursor: &mut impl ReadCursor) -> Result<Value> {
        let bytes = cursor.read_bytes(self.size)?;
        Ok((self.decode)(bytes))
    }
}

impl fmt::Debug for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveType")
            .field("tag", &self.tag)
            .field("size", &self.size)
            .finish()
    }
}

impl PartialEq for PrimitiveType {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.size == other.size
    }
}

/// Primitives available in every table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr, Display)]
pub enum StandardPrimitive {
    #[strum(serialize = "byte")]
    Byte,
    #[strum(serialize = "ubyte")]
    UByte,
    #[strum(serialize = "int16")]
    Int16,
    #[strum(serialize = "uint16")]
    UInt16,
    #[strum(serialize = "int32")]
    Int32,
    #[strum(serialize = "uint32")]
    UInt32,
    #[strum(serialize = "int64")]
    Int64,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "double")]
    Double,
}

impl StandardPrimitive {
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    /// Width in bytes
    ///
    /// `double` is a full IEEE-754 binary64; older layouts that declared it
    /// four bytes wide were wrong and are not reproduced.
    pub fn size(&self) -> usize {
        match self {
            Self::Byte | Self::UByte => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float => 4,
            Self::Int64 | Self::Double => 8,
        }
    }

    fn decode_fn(&self) -> DecodeFn {
        match self {
            Self::Byte => |b: &[u8]| Value::Int(i8::from_le_bytes(le_bytes(b)) as i64),
            Self::UByte => |b: &[u8]| Value::Int(u8::from_le_bytes(le_bytes(b)) as i64),
            Self::Int16 => |b: &[u8]| Value::Int(i16::from_le_bytes(le_bytes(b)) as i64),
            Self::UInt16 => |b: &[u8]| Value::Int(u16::from_le_bytes(le_bytes(b)) as i64),
            Self::Int32 => |b: &[u8]| Value::Int(i32::from_le_bytes(le_bytes(b)) as i64),
            Self::UInt32 => |b: &[u8]| Value::Int(u32::from_le_bytes(le_bytes(b)) as i64),
            Self::Int64 => |b: &[u8]| Value::Int(i64::from_le_bytes(le_bytes(b))),
            Self::Float => |b: &[u8]| Value::Float(f32::from_le_bytes(le_bytes(b)) as f64),
            Self::Double => |b: &[u8]| Value::Float(f64::from_le_bytes(le_bytes(b))),
        }
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        PrimitiveType {
            tag: self.tag(),
            size: self.size(),
            decode: self.decode_fn(),
        }
    }
}

// Callers always pass exactly the primitive's width (see `PrimitiveType::read`).
fn le_bytes<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

static STANDARD: LazyLock<PrimitiveTable> = LazyLock::new(PrimitiveTable::new);

/// Maps symbolic tags to primitive types
#[derive(Debug, Clone)]
pub struct PrimitiveTable {
    types: HashMap<&'static str, PrimitiveType>,
}

impl PrimitiveTable {
    /// Create a table holding the standard primitives
    pub fn new() -> Self {
        let types = StandardPrimitive::iter()
            .map(|p| (p.tag(), p.primitive_type()))
            .collect();
        Self { types }
    }

    /// The shared standard table
    pub fn standard() -> &'static PrimitiveTable {
        &STANDARD
    }

    pub fn lookup(&self, tag: &str) -> Option<PrimitiveType> {
        self.types.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Add or replace a primitive; `decode` receives exactly `size` bytes
    pub fn register(&mut self, tag: &'static str, size: usize, decode: DecodeFn) {
        self.types
            .insert(tag, PrimitiveType { tag, size, decode });
    }

    /// All registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.types.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self::new()
    }
}
