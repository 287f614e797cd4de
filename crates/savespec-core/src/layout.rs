//! Named record layouts persisted as JSON
//!
//! A layout file maps record names to descriptors, e.g.
//!
//! ```json
//! {
//!   "layouts": {
//!     "header": {"kind": "ordered_map", "data": [
//!       ["version", {"kind": "primitive", "data": "int32"}],
//!       ["slot_name", {"kind": "string", "data": {"encoding": "utf-8"}}]
//!     ]}
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compile::compile_with;
use crate::descriptor::{CompiledDescriptor, Descriptor};
use crate::error::{Error, Result};
use crate::primitive::PrimitiveTable;

/// A set of named descriptors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSet {
    pub layouts: BTreeMap<String, Descriptor>,
}

impl LayoutSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: Descriptor) {
        self.layouts.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.layouts.get(name)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Compile every layout against the standard table
    pub fn compile_all(&self) -> Result<BTreeMap<String, CompiledDescriptor>> {
        self.compile_all_with(PrimitiveTable::standard())
    }

    /// Compile every layout, failing on the first invalid one
    ///
    /// The error is wrapped with the failing layout's name.
    pub fn compile_all_with(
        &self,
        table: &PrimitiveTable,
    ) -> Result<BTreeMap<String, CompiledDescriptor>> {
        self.layouts
            .iter()
            .map(|(name, descriptor)| {
                compile_with(descriptor, table)
                    .map(|compiled| (name.clone(), compiled))
                    .map_err(|e| e.in_field(name))
            })
            .collect()
    }
}

/// Load layouts from a JSON file
pub fn load_layouts<P: AsRef<Path>>(path: P) -> Result<LayoutSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let set: LayoutSet = serde_json::from_str(&content)?;
    info!("Loaded {} layouts from {}", set.len(), path.display());
    Ok(set)
}

/// Save layouts to a JSON file
pub fn save_layouts<P: AsRef<Path>>(path: P, set: &LayoutSet) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(set)?;
    fs::write(path, content)?;
    debug!("Saved {} layouts to {}", set.len(), path.display());
    Ok(())
}

/// Load layouts and compile them in one step
///
/// A file without any layouts is rejected with [`Error::EmptyLayoutSet`].
pub fn load_compiled<P: AsRef<Path>>(
    path: P,
    table: &PrimitiveTable,
) -> Result<BTreeMap<String, CompiledDescriptor>> {
    let path = path.as_ref();
    let set = load_layouts(path)?;
    if set.is_empty() {
        return Err(Error::EmptyLayoutSet(path.display().to_string()));
    }
    set.compile_all_with(table)
}
