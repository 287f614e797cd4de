//! Resolution of symbolic primitive references.
//!
//! Compiling walks the descriptor once and produces a new tree in which every
//! primitive (including length prefixes) carries its decode function. Errors in
//! the descriptor itself surface here, before any bytes are read.
//!
//! Compiling an already compiled descriptor returns an equal descriptor.

use std::collections::HashSet;

use tracing::debug;

use crate::decode::TextEncoding;
use crate::descriptor::{CompiledDescriptor, Descriptor, PrimitiveRef};
use crate::error::{Error, Result};
use crate::primitive::{PrimitiveTable, PrimitiveType};

/// Compile against the standard primitive table
pub fn compile(descriptor: &Descriptor) -> Result<CompiledDescriptor> {
    compile_with(descriptor, PrimitiveTable::standard())
}

/// Compile against a custom primitive table
pub fn compile_with(descriptor: &Descriptor, table: &PrimitiveTable) -> Result<CompiledDescriptor> {
    let compiled = compile_node(descriptor, table)?;
    debug!("Compiled {} descriptor", descriptor.kind_name());
    Ok(CompiledDescriptor(compiled))
}

pub(crate) fn compile_node(descriptor: &Descriptor, table: &PrimitiveTable) -> Result<Descriptor> {
    match descriptor {
        Descriptor::Primitive(prim) => Ok(Descriptor::Primitive(resolve(prim, table)?)),
        Descriptor::Sequence(children) => children
            .iter()
            .map(|child| compile_node(child, table))
            .collect::<Result<Vec<_>>>()
            .map(Descriptor::Sequence),
        Descriptor::OrderedMap(fields) => {
            let mut seen = HashSet::with_capacity(fields.len());
            let mut compiled = Vec::with_capacity(fields.len());
            for (name, child) in fields {
                if !seen.insert(name.as_str()) {
                    return Err(Error::DuplicateField(name.clone()));
                }
                let child = compile_node(child, table).map_err(|e| e.in_field(name))?;
                compiled.push((name.clone(), child));
            }
            Ok(Descriptor::OrderedMap(compiled))
        }
        Descriptor::VariableCount {
            element,
            length_prefix,
        } => Ok(Descriptor::VariableCount {
            element: Box::new(compile_node(element, table)?),
            length_prefix: Box::new(compile_length_prefix(length_prefix, table)?),
        }),
        Descriptor::String {
            encoding,
            length_prefix,
        } => {
            TextEncoding::for_label(encoding)?;
            Ok(Descriptor::String {
                encoding: encoding.clone(),
                length_prefix: Box::new(compile_length_prefix(length_prefix, table)?),
            })
        }
    }
}

fn compile_length_prefix(prefix: &Descriptor, table: &PrimitiveTable) -> Result<Descriptor> {
    match prefix {
        Descriptor::Primitive(prim) => Ok(Descriptor::Primitive(resolve(prim, table)?)),
        other => Err(Error::CompositeLengthPrefix(other.kind_name())),
    }
}

fn resolve(prim: &PrimitiveRef, table: &PrimitiveTable) -> Result<PrimitiveRef> {
    lookup(prim, table).map(PrimitiveRef::Resolved)
}

/// The primitive type behind a reference, looking tags up in `table`
pub(crate) fn lookup(prim: &PrimitiveRef, table: &PrimitiveTable) -> Result<PrimitiveType> {
    match prim {
        PrimitiveRef::Resolved(resolved) => Ok(*resolved),
        PrimitiveRef::Tag(tag) => table
            .lookup(tag)
            .ok_or_else(|| Error::UnknownPrimitive(tag.clone())),
    }
}
