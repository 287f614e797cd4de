//! Decode engine: interprets a descriptor against a read cursor.
//!
//! Every step consumes bytes from the same cursor in declared order, so one
//! cursor must not be shared between concurrent decodes.

mod text;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

pub use text::TextEncoding;

use crate::compile::{compile_node, lookup};
use crate::config::DecodeConfig;
use crate::cursor::ReadCursor;
use crate::descriptor::{Descriptor, PrimitiveRef};
use crate::error::{Error, Result};
use crate::primitive::PrimitiveTable;
use crate::size::min_size;
use crate::value::Value;

/// Decodes descriptors against cursors.
///
/// Holds the primitive table used for any tag left unresolved (descriptors
/// that were never compiled) and the decode options.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    table: &'t PrimitiveTable,
    config: DecodeConfig,
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(PrimitiveTable::standard())
    }
}

impl<'t> Decoder<'t> {
    pub fn new(table: &'t PrimitiveTable) -> Self {
        Self::with_config(table, DecodeConfig::default())
    }

    pub fn with_config(table: &'t PrimitiveTable, config: DecodeConfig) -> Self {
        Self { table, config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode a whole record starting at the cursor's position.
    ///
    /// Ordered maps come back as [`Value::Map`] in declared order; every other
    /// descriptor comes back as its positional value.
    pub fn read_structure(
        &self,
        descriptor: &Descriptor,
        cursor: &mut impl ReadCursor,
    ) -> Result<Value> {
        let start = cursor.position();
        debug!(
            "Reading {} at offset {:#x} (resolved: {})",
            descriptor.kind_name(),
            start,
            descriptor.is_resolved()
        );
        let value = self.decode(descriptor, cursor)?;
        debug!(
            "Read {} bytes from offset {:#x}",
            cursor.position() - start,
            start
        );
        Ok(value)
    }

    /// Decode one descriptor, dispatching on its kind.
    pub fn decode(&self, descriptor: &Descriptor, cursor: &mut impl ReadCursor) -> Result<Value> {
        match descriptor {
            Descriptor::Primitive(prim) => self.decode_primitive(prim, cursor),
            Descriptor::Sequence(children) => self
                .decode_positional(children.iter(), cursor)
                .map(Value::Sequence),
            Descriptor::OrderedMap(fields) => self.decode_map(fields, cursor),
            Descriptor::VariableCount {
                element,
                length_prefix,
            } => self.decode_variable_count(element, length_prefix, cursor),
            Descriptor::String {
                encoding,
                length_prefix,
            } => self.decode_string(encoding, length_prefix, cursor),
        }
    }

    fn decode_primitive(&self, prim: &PrimitiveRef, cursor: &mut impl ReadCursor) -> Result<Value> {
        match prim {
            PrimitiveRef::Resolved(resolved) => resolved.read(cursor),
            PrimitiveRef::Tag(tag) => {
                warn!("Resolving primitive `{}` at decode time", tag);
                lookup(prim, self.table)?.read(cursor)
            }
        }
    }

    fn decode_positional<'d>(
        &self,
        children: impl Iterator<Item = &'d Descriptor>,
        cursor: &mut impl ReadCursor,
    ) -> Result<Vec<Value>> {
        children.map(|child| self.decode(child, cursor)).collect()
    }

    fn decode_map(
        &self,
        fields: &[(String, Descriptor)],
        cursor: &mut impl ReadCursor,
    ) -> Result<Value> {
        let mut values = IndexMap::with_capacity(fields.len());
        for (name, child) in fields {
            trace!("Field `{}` at offset {:#x}", name, cursor.position());
            let value = self.decode(child, cursor).map_err(|e| e.in_field(name))?;
            if values.insert(name.clone(), value).is_some() {
                return Err(Error::DuplicateField(name.clone()));
            }
        }
        Ok(Value::Map(values))
    }

    fn decode_variable_count(
        &self,
        element: &Descriptor,
        length_prefix: &Descriptor,
        cursor: &mut impl ReadCursor,
    ) -> Result<Value> {
        // An unresolved element is checked in full up front, so a zero count
        // still reports unknown tags and duplicate names.
        let resolved;
        let element = if element.is_resolved() {
            element
        } else {
            resolved = compile_node(element, self.table)?;
            &resolved
        };

        let count = self.read_length(length_prefix, cursor)?;
        if let Some(limit) = self.config.max_count {
            if count > limit {
                return Err(Error::CountLimitExceeded { count, limit });
            }
        }

        // Zero-width elements are bounded as if each took one byte.
        let element_size = min_size(element, self.table).max(1);
        let remaining = cursor.remaining();
        match count.checked_mul(element_size) {
            Some(required) if required <= remaining => {}
            _ => {
                return Err(Error::LengthExceedsBuffer {
                    length: count,
                    required: count.saturating_mul(element_size),
                    remaining,
                });
            }
        }

        trace!("Decoding {} x {}", count, element.kind_name());
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.decode(element, cursor)?);
        }
        Ok(Value::Sequence(items))
    }

    fn decode_string(
        &self,
        encoding: &str,
        length_prefix: &Descriptor,
        cursor: &mut impl ReadCursor,
    ) -> Result<Value> {
        let encoding = TextEncoding::for_label(encoding)?;
        let length = self.read_length(length_prefix, cursor)?;
        let remaining = cursor.remaining();
        if length > remaining {
            return Err(Error::LengthExceedsBuffer {
                length,
                required: length,
                remaining,
            });
        }

        let mut bytes = cursor.read_bytes(length)?;
        if self.config.trim_nul {
            if let Some(end) = bytes.iter().position(|&b| b == 0) {
                bytes = &bytes[..end];
            }
        }
        encoding.decode(bytes).map(Value::String)
    }

    /// Read a count or byte length through a primitive length prefix.
    fn read_length(&self, length_prefix: &Descriptor, cursor: &mut impl ReadCursor) -> Result<usize> {
        let Descriptor::Primitive(prim) = length_prefix else {
            return Err(Error::CompositeLengthPrefix(length_prefix.kind_name()));
        };
        match self.decode_primitive(prim, cursor)? {
            Value::Int(n) if n < 0 => Err(Error::NegativeLength(n)),
            Value::Int(n) => usize::try_from(n).map_err(|_| Error::LengthExceedsBuffer {
                length: usize::MAX,
                required: usize::MAX,
                remaining: cursor.remaining(),
            }),
            other => Err(Error::NonIntegerLength(other.to_string())),
        }
    }
}

/// Decode a record with the standard primitive table and default options.
pub fn read_structure(descriptor: &Descriptor, cursor: &mut impl ReadCursor) -> Result<Value> {
    Decoder::default().read_structure(descriptor, cursor)
}
