//! Selection - the operator's per-quotation choices
//!
//! A selection carries everything the editing surface hands to the rollup:
//! how many of each assembly, extra component lines that no assembly drives,
//! manual corrections of individual component quantities, and the headcount
//! used for labor. It is plain data; nothing in it refers back to earlier
//! rollups.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::QuoteError;
use crate::yaml::{parse_yaml, parse_yaml_file};

/// An ad-hoc component line added outside of any assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLine {
    pub component_id: i64,
    pub quantity: Decimal,
    /// Lines with `included: false` are carried but never costed
    #[serde(default = "default_included")]
    pub included: bool,
}

/// Manual correction of one component's assembly-derived quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub quantity: Decimal,
    /// `false` drops the component from the quotation entirely
    #[serde(default = "default_included")]
    pub included: bool,
}

fn default_included() -> bool {
    true
}

/// Operator selection for a single quotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selection {
    /// Assembly ID -> multiplicity (0 = not selected)
    pub assembly_picks: BTreeMap<i64, i64>,

    /// Extra component lines
    pub extra_lines: Vec<ExtraLine>,

    /// Component ID -> quantity override
    pub overrides: BTreeMap<i64, Override>,

    /// People billed for labor
    pub headcount: i64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the multiplicity for an assembly, replacing any earlier pick
    pub fn pick(mut self, assembly_id: i64, multiplicity: i64) -> Self {
        self.assembly_picks.insert(assembly_id, multiplicity);
        self
    }

    pub fn extra(mut self, component_id: i64, quantity: Decimal, included: bool) -> Self {
        self.extra_lines.push(ExtraLine {
            component_id,
            quantity,
            included,
        });
        self
    }

    pub fn override_quantity(mut self, component_id: i64, quantity: Decimal, included: bool) -> Self {
        self.overrides
            .insert(component_id, Override { quantity, included });
        self
    }

    pub fn with_headcount(mut self, headcount: i64) -> Self {
        self.headcount = headcount;
        self
    }

    /// Picks with a multiplicity above zero, in assembly ID order
    pub fn active_picks(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.assembly_picks
            .iter()
            .filter(|(_, m)| **m > 0)
            .map(|(id, m)| (*id, *m))
    }

    /// Reject negative multiplicities, quantities and headcount
    ///
    /// The first offending field is reported; nothing is clamped.
    pub fn validate(&self) -> Result<(), QuoteError> {
        for (id, m) in &self.assembly_picks {
            if *m < 0 {
                return Err(QuoteError::validation(
                    format!("assembly_picks[{}]", id),
                    format!("multiplicity must not be negative (got {})", m),
                ));
            }
        }

        for (i, line) in self.extra_lines.iter().enumerate() {
            if line.quantity < Decimal::ZERO {
                return Err(QuoteError::validation(
                    format!("extra_lines[{}].quantity", i),
                    format!("quantity must not be negative (got {})", line.quantity),
                ));
            }
        }

        for (id, ov) in &self.overrides {
            if ov.quantity < Decimal::ZERO {
                return Err(QuoteError::validation(
                    format!("overrides[{}].quantity", id),
                    format!("quantity must not be negative (got {})", ov.quantity),
                ));
            }
        }

        if self.headcount < 0 {
            return Err(QuoteError::validation(
                "headcount",
                format!("headcount must not be negative (got {})", self.headcount),
            ));
        }

        Ok(())
    }

    /// Parse a selection from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, QuoteError> {
        Ok(parse_yaml(contents, "selection")?)
    }

    /// Load a selection file from disk
    pub fn load(path: &Path) -> Result<Self, QuoteError> {
        Ok(parse_yaml_file(path)?)
    }

    /// Example selection file, printed by `bomq quote template`
    pub fn template() -> &'static str {
        r#"# bomq selection file
#
# assembly_picks: assembly ID -> number of units (0 = not selected)
assembly_picks:
  1: 3
  5: 1

# extra_lines: components added outside of any assembly
extra_lines:
  - component_id: 40
    quantity: 2
    included: true

# overrides: replace the assembly-derived quantity of a component
#   included: false removes the component from the quotation
overrides:
  2:
    quantity: 10
    included: true

# headcount: people billed for labor
headcount: 2
"#
    }
}
