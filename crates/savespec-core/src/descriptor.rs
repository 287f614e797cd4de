//! Declarative descriptions of binary record layouts.
//!
//! A [`Descriptor`] is plain data: build it once with the constructor
//! functions in this module, [`compile`](crate::compile) it, then decode it
//! against as many cursors as needed.
//!
//! ```ignore
//! use savespec_core::descriptor::{ordered_map, string, variable_count};
//!
//! let character = ordered_map([
//!     ("level", "int16".into()),
//!     ("name", string("utf-8")),
//!     ("inventory", variable_count("int32".into())),
//! ]);
//! ```

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::primitive::{PrimitiveType, StandardPrimitive};

/// Tag of the length prefix used when none is given
pub const DEFAULT_LENGTH_PREFIX: StandardPrimitive = StandardPrimitive::Int32;

/// A reference to a primitive, either by tag or already resolved
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveRef {
    Tag(String),
    Resolved(PrimitiveType),
}

impl PrimitiveRef {
    pub fn tag(&self) -> &str {
        match self {
            PrimitiveRef::Tag(tag) => tag,
            PrimitiveRef::Resolved(prim) => prim.tag,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PrimitiveRef::Resolved(_))
    }
}

impl Serialize for PrimitiveRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for PrimitiveRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(PrimitiveRef::Tag)
    }
}

/// The shape of a region of bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Descriptor {
    /// A single fixed-size scalar.
    Primitive(PrimitiveRef),
    /// Children decoded in order into a positional sequence.
    Sequence(Vec<Descriptor>),
    /// Named children decoded in order into a mapping.
    ///
    /// Names occupy no bytes and must be unique within one map.
    OrderedMap(Vec<(String, Descriptor)>),
    /// A count read with `length_prefix`, followed by that many `element`s.
    VariableCount {
        element: Box<Descriptor>,
        #[serde(default = "default_length_prefix")]
        length_prefix: Box<Descriptor>,
    },
    /// A byte length read with `length_prefix`, followed by that many bytes of
    /// text in `encoding`.
    String {
        encoding: String,
        #[serde(default = "default_length_prefix")]
        length_prefix: Box<Descriptor>,
    },
}

fn default_length_prefix() -> Box<Descriptor> {
    Box::new(primitive(DEFAULT_LENGTH_PREFIX.tag()))
}

/// Reference a primitive by tag.
pub fn primitive(tag: &str) -> Descriptor {
    Descriptor::Primitive(PrimitiveRef::Tag(tag.to_string()))
}

/// A positional composite.
pub fn sequence(children: impl IntoIterator<Item = Descriptor>) -> Descriptor {
    Descriptor::Sequence(children.into_iter().collect())
}

/// A named composite, decoded into a mapping in declared order.
pub fn ordered_map<S: Into<String>>(
    fields: impl IntoIterator<Item = (S, Descriptor)>,
) -> Descriptor {
    Descriptor::OrderedMap(
        fields
            .into_iter()
            .map(|(name, descriptor)| (name.into(), descriptor))
            .collect(),
    )
}

/// Repeated `element`, preceded by an `int32` count.
pub fn variable_count(element: Descriptor) -> Descriptor {
    variable_count_with_prefix(element, primitive(DEFAULT_LENGTH_PREFIX.tag()))
}

pub fn variable_count_with_prefix(element: Descriptor, length_prefix: Descriptor) -> Descriptor {
    Descriptor::VariableCount {
        element: Box::new(element),
        length_prefix: Box::new(length_prefix),
    }
}

/// Text in `encoding`, preceded by an `int32` byte length.
pub fn string(encoding: &str) -> Descriptor {
    string_with_prefix(encoding, primitive(DEFAULT_LENGTH_PREFIX.tag()))
}

pub fn string_with_prefix(encoding: &str, length_prefix: Descriptor) -> Descriptor {
    Descriptor::String {
        encoding: encoding.to_string(),
        length_prefix: Box::new(length_prefix),
    }
}

impl From<&str> for Descriptor {
    fn from(tag: &str) -> Self {
        primitive(tag)
    }
}

impl From<StandardPrimitive> for Descriptor {
    fn from(prim: StandardPrimitive) -> Self {
        Descriptor::Primitive(PrimitiveRef::Resolved(prim.primitive_type()))
    }
}

impl Descriptor {
    /// A short name for the kind of descriptor, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Descriptor::Primitive(_) => "primitive",
            Descriptor::Sequence(_) => "sequence",
            Descriptor::OrderedMap(_) => "ordered_map",
            Descriptor::VariableCount { .. } => "variable_count",
            Descriptor::String { .. } => "string",
        }
    }

    /// Return true if every primitive reference in the tree is resolved.
    pub fn is_resolved(&self) -> bool {
        match self {
            Descriptor::Primitive(prim) => prim.is_resolved(),
            Descriptor::Sequence(children) => children.iter().all(Descriptor::is_resolved),
            Descriptor::OrderedMap(fields) => fields.iter().all(|(_, d)| d.is_resolved()),
            Descriptor::VariableCount {
                element,
                length_prefix,
            } => element.is_resolved() && length_prefix.is_resolved(),
            Descriptor::String { length_prefix, .. } => length_prefix.is_resolved(),
        }
    }

    /// Field names of an ordered map, in declared order.
    pub fn field_names(&self) -> Option<Vec<&str>> {
        match self {
            Descriptor::OrderedMap(fields) => {
                Some(fields.iter().map(|(name, _)| name.as_str()).collect())
            }
            _ => None,
        }
    }
}

/// A descriptor whose primitive references have all been resolved.
///
/// Only produced by [`compile`](crate::compile).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDescriptor(pub(crate) Descriptor);

impl CompiledDescriptor {
    pub fn into_inner(self) -> Descriptor {
        self.0
    }
}

impl Deref for CompiledDescriptor {
    type Target = Descriptor;

    fn deref(&self) -> &Descriptor {
        &self.0
    }
}

impl AsRef<Descriptor> for CompiledDescriptor {
    fn as_ref(&self) -> &Descriptor {
        &self.0
    }
}

impl Serialize for CompiledDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
