//! Rollup engine - selected assemblies and extras into component demand
//!
//! Every call starts from an empty accumulator and reads only the snapshots
//! it is given, so deselecting an assembly can never leave residue from an
//! earlier rollup.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::catalog::{resolve_line, AssemblyCatalog, Catalog};
use crate::core::error::QuoteError;
use crate::entities::Selection;

/// Aggregated demand for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandEntry {
    pub component_id: i64,
    pub name: String,
    pub total_quantity: Decimal,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
}

/// Result of a rollup, ordered by catalog declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateDemand {
    entries: Vec<DemandEntry>,
}

impl AggregateDemand {
    pub fn entries(&self) -> &[DemandEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DemandEntry> {
        self.entries
    }

    pub fn get(&self, component_id: i64) -> Option<&DemandEntry> {
        self.entries.iter().find(|e| e.component_id == component_id)
    }

    /// Sum of every entry's total cost
    pub fn material_total(&self) -> Result<Decimal, QuoteError> {
        self.entries.iter().try_fold(Decimal::ZERO, |acc, e| {
            acc.checked_add(e.total_cost)
                .ok_or_else(|| QuoteError::too_large("material_total"))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Add `quantity` to a component's running total without overflowing
fn accumulate(
    quantities: &mut HashMap<i64, Decimal>,
    component_id: i64,
    quantity: Decimal,
    field: impl FnOnce() -> String,
) -> Result<(), QuoteError> {
    let slot = quantities.entry(component_id).or_default();
    *slot = slot
        .checked_add(quantity)
        .ok_or_else(|| QuoteError::too_large(field()))?;
    Ok(())
}

/// Check that every ID the selection mentions exists in the snapshots
fn check_selection_ids(
    catalog: &Catalog,
    assemblies: &AssemblyCatalog,
    selection: &Selection,
) -> Result<(), QuoteError> {
    for id in selection.assembly_picks.keys() {
        if !assemblies.contains(*id) {
            return Err(QuoteError::validation(
                format!("assembly_picks[{}]", id),
                format!("unknown assembly {}", id),
            ));
        }
    }

    for (i, line) in selection.extra_lines.iter().enumerate() {
        if !catalog.contains(line.component_id) {
            return Err(QuoteError::validation(
                format!("extra_lines[{}].component_id", i),
                format!("unknown component {}", line.component_id),
            ));
        }
    }

    for id in selection.overrides.keys() {
        if !catalog.contains(*id) {
            return Err(QuoteError::validation(
                format!("overrides[{}]", id),
                format!("unknown component {}", id),
            ));
        }
    }

    Ok(())
}

/// Expand a selection into per-component demand
///
/// Quantities combine as follows for each component:
/// - selected assemblies contribute `quantity_per_unit x multiplicity`;
/// - an included override replaces that assembly-derived sum;
/// - included extra lines add on top;
/// - an excluded override removes the component whatever else demands it.
///
/// Components end up in the result when their quantity is positive, or when
/// an included override or extra line names them explicitly.
pub fn rollup(
    catalog: &Catalog,
    assemblies: &AssemblyCatalog,
    selection: &Selection,
) -> Result<AggregateDemand, QuoteError> {
    selection.validate()?;
    check_selection_ids(catalog, assemblies, selection)?;

    let mut quantities: HashMap<i64, Decimal> = HashMap::new();
    let mut explicit: HashSet<i64> = HashSet::new();
    let mut removed: HashSet<i64> = HashSet::new();

    for (assembly_id, multiplicity) in selection.active_picks() {
        let Some(assembly) = assemblies.get(assembly_id) else {
            return Err(QuoteError::assembly_not_found(assembly_id));
        };
        let multiplicity = Decimal::from(multiplicity);
        for line in &assembly.bom {
            let component = resolve_line(catalog, assembly, line)?;
            let field = || format!("assembly_picks[{}]", assembly_id);
            let contribution = line
                .quantity_per_unit
                .checked_mul(multiplicity)
                .ok_or_else(|| QuoteError::too_large(field()))?;
            accumulate(&mut quantities, component.id, contribution, field)?;
        }
    }

    for (component_id, ov) in &selection.overrides {
        if ov.included {
            if !quantities.contains_key(component_id) {
                tracing::warn!(
                    component_id,
                    "override targets a component no selected assembly uses"
                );
            }
            quantities.insert(*component_id, ov.quantity);
            explicit.insert(*component_id);
        } else {
            quantities.remove(component_id);
            removed.insert(*component_id);
        }
    }

    for (i, line) in selection.extra_lines.iter().enumerate() {
        if !line.included || removed.contains(&line.component_id) {
            continue;
        }
        accumulate(&mut quantities, line.component_id, line.quantity, || {
            format!("extra_lines[{}].quantity", i)
        })?;
        explicit.insert(line.component_id);
    }

    let mut entries = Vec::new();
    for component in catalog.iter() {
        let Some(&quantity) = quantities.get(&component.id) else {
            continue;
        };
        if quantity > Decimal::ZERO || explicit.contains(&component.id) {
            entries.push(DemandEntry {
                component_id: component.id,
                name: component.name.clone(),
                total_quantity: quantity,
                unit_price: component.unit_price,
                total_cost: component.cost_of(quantity)?,
            });
        }
    }
    let demand = AggregateDemand { entries };

    tracing::debug!(
        picks = selection.active_picks().count(),
        extras = selection.extra_lines.len(),
        overrides = selection.overrides.len(),
        components = demand.len(),
        "rollup complete"
    );

    Ok(demand)
}
