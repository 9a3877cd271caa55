//! Immutable catalog snapshots handed to the rollup engine
//!
//! The store produces these once per quotation. Both keep declaration order
//! (the order records were inserted) alongside an ID index, so lookups are
//! cheap and output ordering stays deterministic.

use std::collections::HashMap;

use crate::core::error::QuoteError;
use crate::entities::{Assembly, BomLine, Component};

/// Snapshot of the component catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<Component>,
    index: HashMap<i64, usize>,
}

impl Catalog {
    /// Build a catalog from components in declaration order
    ///
    /// Duplicate IDs are an integrity error.
    pub fn new(components: Vec<Component>) -> Result<Self, QuoteError> {
        let mut index = HashMap::with_capacity(components.len());
        for (pos, cmp) in components.iter().enumerate() {
            if index.insert(cmp.id, pos).is_some() {
                return Err(QuoteError::integrity(format!(
                    "component id {} appears twice in the catalog",
                    cmp.id
                )));
            }
        }
        Ok(Self { components, index })
    }

    pub fn get(&self, id: i64) -> Option<&Component> {
        self.index.get(&id).map(|&pos| &self.components[pos])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Snapshot of the assembly catalog with BOMs
#[derive(Debug, Clone, Default)]
pub struct AssemblyCatalog {
    assemblies: Vec<Assembly>,
    index: HashMap<i64, usize>,
}

impl AssemblyCatalog {
    pub fn new(assemblies: Vec<Assembly>) -> Result<Self, QuoteError> {
        let mut index = HashMap::with_capacity(assemblies.len());
        for (pos, asm) in assemblies.iter().enumerate() {
            if index.insert(asm.id, pos).is_some() {
                return Err(QuoteError::integrity(format!(
                    "assembly id {} appears twice in the catalog",
                    asm.id
                )));
            }
        }
        Ok(Self { assemblies, index })
    }

    pub fn get(&self, id: i64) -> Option<&Assembly> {
        self.index.get(&id).map(|&pos| &self.assemblies[pos])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assembly> {
        self.assemblies.iter()
    }

    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }

    /// Verify every BOM line resolves against the given component catalog
    pub fn check_references(&self, catalog: &Catalog) -> Result<(), QuoteError> {
        for asm in &self.assemblies {
            for line in &asm.bom {
                resolve_line(catalog, asm, line)?;
            }
        }
        Ok(())
    }
}

/// Look up the component a BOM line points at
///
/// A miss is an integrity error: the line is never dropped.
pub fn resolve_line<'a>(
    catalog: &'a Catalog,
    assembly: &Assembly,
    line: &BomLine,
) -> Result<&'a Component, QuoteError> {
    catalog.get(line.component_id).ok_or_else(|| {
        QuoteError::integrity(format!(
            "assembly {} ('{}') references component {} which is not in the catalog",
            assembly.id, assembly.name, line.component_id
        ))
    })
}
