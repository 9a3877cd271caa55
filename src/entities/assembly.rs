//! Assembly entity - a named, fixed bill of materials

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// BOM line item - references a component with a per-unit quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    /// Component ID; must resolve in the catalog
    pub component_id: i64,

    /// Quantity of this component per assembly unit
    pub quantity_per_unit: Decimal,
}

impl BomLine {
    pub fn new(component_id: i64, quantity_per_unit: Decimal) -> Self {
        Self {
            component_id,
            quantity_per_unit,
        }
    }
}

/// Assembly entity - immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    /// Store-assigned identifier
    pub id: i64,

    /// Assembly name
    pub name: String,

    /// Date the assembly was submitted to the catalog
    pub created: NaiveDate,

    /// Bill of materials in declaration order
    #[serde(default)]
    pub bom: Vec<BomLine>,
}

impl Assembly {
    pub fn new(id: i64, name: impl Into<String>, created: NaiveDate, bom: Vec<BomLine>) -> Self {
        Self {
            id,
            name: name.into(),
            created,
            bom,
        }
    }

    /// Number of BOM lines
    pub fn bom_line_count(&self) -> usize {
        self.bom.len()
    }

    /// Whether the BOM references the given component
    pub fn uses_component(&self, component_id: i64) -> bool {
        self.bom.iter().any(|l| l.component_id == component_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_assembly_creation() {
        let asm = Assembly::new(1, "Power Management", date(), vec![]);
        assert_eq!(asm.name, "Power Management");
        assert_eq!(asm.bom_line_count(), 0);
    }

    #[test]
    fn test_bom_lookup() {
        let asm = Assembly::new(
            3,
            "Power Management",
            date(),
            vec![BomLine::new(5, dec!(0.1)), BomLine::new(6, dec!(0.2))],
        );
        assert_eq!(asm.bom_line_count(), 2);
        assert!(asm.uses_component(6));
        assert!(!asm.uses_component(7));
    }

    #[test]
    fn test_assembly_roundtrips_through_yaml() {
        let asm = Assembly::new(2, "Memory", date(), vec![BomLine::new(4, dec!(0.2))]);
        let yaml = serde_yml::to_string(&asm).unwrap();
        let parsed: Assembly = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, asm);
    }
}
