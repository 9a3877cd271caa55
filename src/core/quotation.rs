//! Quotation assembler - demand, labor and picks into a quotation
//!
//! The summary section prices each assembly "as designed" from its own BOM,
//! so operator overrides never change it. The detail section and the
//! material total use the rolled-up demand "as provisioned".

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::catalog::{resolve_line, AssemblyCatalog, Catalog};
use crate::core::error::QuoteError;
use crate::core::rollup::{rollup, AggregateDemand, DemandEntry};
use crate::entities::Selection;

/// Linear labor pricing: a fixed rate per head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaborModel {
    pub rate_per_head: Decimal,
}

impl LaborModel {
    pub fn new(rate_per_head: Decimal) -> Result<Self, QuoteError> {
        if rate_per_head < Decimal::ZERO {
            return Err(QuoteError::validation(
                "labor_rate",
                format!("labor rate must not be negative (got {})", rate_per_head),
            ));
        }
        Ok(Self { rate_per_head })
    }

    /// Labor cost for a headcount; negative headcount is rejected
    pub fn cost(&self, headcount: i64) -> Result<Decimal, QuoteError> {
        if headcount < 0 {
            return Err(QuoteError::validation(
                "headcount",
                format!("headcount must not be negative (got {})", headcount),
            ));
        }
        Decimal::from(headcount)
            .checked_mul(self.rate_per_head)
            .ok_or_else(|| QuoteError::too_large("labor_total"))
    }
}

impl Default for LaborModel {
    fn default() -> Self {
        Self {
            rate_per_head: Decimal::from(crate::core::config::DEFAULT_LABOR_RATE),
        }
    }
}

/// One row of the assembly summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyLine {
    pub assembly_id: i64,
    pub name: String,
    pub multiplicity: i64,
    pub unit_cost: Decimal,
    pub line_total: Decimal,
}

/// A complete quotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quotation {
    pub assembly_lines: Vec<AssemblyLine>,
    pub component_lines: Vec<DemandEntry>,
    pub headcount: i64,
    pub labor_rate: Decimal,
    pub material_total: Decimal,
    pub labor_total: Decimal,
    pub grand_total: Decimal,
}

impl Quotation {
    /// Recheck totals against the line collections
    ///
    /// Holds for every quotation produced by [`assemble`]; renderers call it
    /// before writing anything.
    pub fn verify_totals(&self) -> Result<(), QuoteError> {
        let material = self
            .component_lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.total_cost))
            .ok_or_else(|| QuoteError::integrity("component line costs overflow"))?;
        if material != self.material_total {
            return Err(QuoteError::integrity(format!(
                "material total {} does not match component lines ({})",
                self.material_total, material
            )));
        }
        let labor = Decimal::from(self.headcount).checked_mul(self.labor_rate);
        if labor != Some(self.labor_total) {
            return Err(QuoteError::integrity(format!(
                "labor total {} does not match {} x {}",
                self.labor_total, self.headcount, self.labor_rate
            )));
        }
        if self.material_total.checked_add(self.labor_total) != Some(self.grand_total) {
            return Err(QuoteError::integrity(format!(
                "grand total {} is not material {} + labor {}",
                self.grand_total, self.material_total, self.labor_total
            )));
        }
        Ok(())
    }
}

/// Intrinsic per-unit cost of an assembly from its own BOM
pub fn assembly_unit_cost(
    catalog: &Catalog,
    assemblies: &AssemblyCatalog,
    assembly_id: i64,
) -> Result<Decimal, QuoteError> {
    let assembly = assemblies
        .get(assembly_id)
        .ok_or_else(|| QuoteError::assembly_not_found(assembly_id))?;

    let mut unit_cost = Decimal::ZERO;
    for line in &assembly.bom {
        let component = resolve_line(catalog, assembly, line)?;
        unit_cost = unit_cost
            .checked_add(component.cost_of(line.quantity_per_unit)?)
            .ok_or_else(|| QuoteError::too_large(format!("assemblies[{}]", assembly_id)))?;
    }
    Ok(unit_cost)
}

/// Combine picks, rolled-up demand and labor into a quotation
///
/// Summary lines follow assembly catalog order and include only picks with
/// a multiplicity above zero.
pub fn assemble(
    picks: &BTreeMap<i64, i64>,
    assemblies: &AssemblyCatalog,
    catalog: &Catalog,
    demand: AggregateDemand,
    headcount: i64,
    labor: &LaborModel,
) -> Result<Quotation, QuoteError> {
    let labor_total = labor.cost(headcount)?;

    for (id, multiplicity) in picks {
        if *multiplicity < 0 {
            return Err(QuoteError::validation(
                format!("assembly_picks[{}]", id),
                format!("multiplicity must not be negative (got {})", multiplicity),
            ));
        }
        if !assemblies.contains(*id) {
            return Err(QuoteError::validation(
                format!("assembly_picks[{}]", id),
                format!("unknown assembly {}", id),
            ));
        }
    }

    let mut assembly_lines = Vec::new();
    for assembly in assemblies.iter() {
        let multiplicity = picks.get(&assembly.id).copied().unwrap_or(0);
        if multiplicity == 0 {
            continue;
        }
        let unit_cost = assembly_unit_cost(catalog, assemblies, assembly.id)?;
        let line_total = unit_cost
            .checked_mul(Decimal::from(multiplicity))
            .ok_or_else(|| QuoteError::too_large(format!("assembly_picks[{}]", assembly.id)))?;
        assembly_lines.push(AssemblyLine {
            assembly_id: assembly.id,
            name: assembly.name.clone(),
            multiplicity,
            unit_cost,
            line_total,
        });
    }

    let material_total = demand.material_total()?;
    let grand_total = material_total
        .checked_add(labor_total)
        .ok_or_else(|| QuoteError::too_large("grand_total"))?;
    let quotation = Quotation {
        assembly_lines,
        component_lines: demand.into_entries(),
        headcount,
        labor_rate: labor.rate_per_head,
        material_total,
        labor_total,
        grand_total,
    };

    tracing::debug!(
        assemblies = quotation.assembly_lines.len(),
        components = quotation.component_lines.len(),
        material = %quotation.material_total,
        labor = %quotation.labor_total,
        grand = %quotation.grand_total,
        "quotation assembled"
    );

    Ok(quotation)
}

/// Run the rollup and assemble the quotation in one step
pub fn build_quotation(
    catalog: &Catalog,
    assemblies: &AssemblyCatalog,
    selection: &Selection,
    labor: &LaborModel,
) -> Result<Quotation, QuoteError> {
    let demand = rollup(catalog, assemblies, selection)?;
    assemble(
        &selection.assembly_picks,
        assemblies,
        catalog,
        demand,
        selection.headcount,
        labor,
    )
}
