//! Byte-size calculations over descriptors.

use tracing::debug;

use crate::compile::lookup;
use crate::descriptor::{Descriptor, PrimitiveRef};
use crate::error::Result;
use crate::primitive::PrimitiveTable;

/// Sum the widths of the primitives in a flat record.
///
/// Accepts a bare primitive, a sequence of primitives, or an ordered map of
/// primitives. Nested sequences, maps, variable-count and string children are
/// skipped, so the result undercounts any record that has them; only use this
/// for flat fixed-width records. See [`exact_size`] for the recursive version.
pub fn fixed_size(descriptor: &Descriptor) -> Result<usize> {
    fixed_size_with(descriptor, PrimitiveTable::standard())
}

pub fn fixed_size_with(descriptor: &Descriptor, table: &PrimitiveTable) -> Result<usize> {
    let children: Vec<&Descriptor> = match descriptor {
        Descriptor::Primitive(prim) => return primitive_size(prim, table),
        Descriptor::Sequence(children) => children.iter().collect(),
        Descriptor::OrderedMap(fields) => fields.iter().map(|(_, d)| d).collect(),
        Descriptor::VariableCount { .. } | Descriptor::String { .. } => {
            debug!("fixed_size called on {}, returning 0", descriptor.kind_name());
            return Ok(0);
        }
    };

    let mut total = 0;
    for child in children {
        match child {
            Descriptor::Primitive(prim) => total += primitive_size(prim, table)?,
            nested => debug!("fixed_size skipping nested {}", nested.kind_name()),
        }
    }
    Ok(total)
}

/// Exact size of a record, or `None` if any part of it is variable-length.
pub fn exact_size(descriptor: &Descriptor) -> Result<Option<usize>> {
    exact_size_with(descriptor, PrimitiveTable::standard())
}

pub fn exact_size_with(descriptor: &Descriptor, table: &PrimitiveTable) -> Result<Option<usize>> {
    match descriptor {
        Descriptor::Primitive(prim) => primitive_size(prim, table).map(Some),
        Descriptor::Sequence(children) => sum_exact(children.iter(), table),
        Descriptor::OrderedMap(fields) => sum_exact(fields.iter().map(|(_, d)| d), table),
        Descriptor::VariableCount { .. } | Descriptor::String { .. } => Ok(None),
    }
}

fn sum_exact<'d>(
    children: impl Iterator<Item = &'d Descriptor>,
    table: &PrimitiveTable,
) -> Result<Option<usize>> {
    let mut total = 0;
    for child in children {
        match exact_size_with(child, table)? {
            Some(size) => total += size,
            None => return Ok(None),
        }
    }
    Ok(Some(total))
}

/// Fewest bytes a descriptor can occupy: every count and length taken as zero.
///
/// Unknown tags count as zero here; decoding reports them.
pub(crate) fn min_size(descriptor: &Descriptor, table: &PrimitiveTable) -> usize {
    let prefix_size = |prefix: &Descriptor| match prefix {
        Descriptor::Primitive(prim) => primitive_size(prim, table).unwrap_or(0),
        _ => 0,
    };
    match descriptor {
        Descriptor::Primitive(prim) => primitive_size(prim, table).unwrap_or(0),
        Descriptor::Sequence(children) => children.iter().map(|d| min_size(d, table)).sum(),
        Descriptor::OrderedMap(fields) => fields.iter().map(|(_, d)| min_size(d, table)).sum(),
        Descriptor::VariableCount { length_prefix, .. }
        | Descriptor::String { length_prefix, .. } => prefix_size(length_prefix),
    }
}

fn primitive_size(prim: &PrimitiveRef, table: &PrimitiveTable) -> Result<usize> {
    lookup(prim, table).map(|resolved| resolved.size)
}
