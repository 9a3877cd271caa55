//! Component entity type - priced catalog parts consumed by assemblies

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::QuoteError;

/// A priced part that assemblies consume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Store-assigned identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Price per unit of quantity, never negative
    pub unit_price: Decimal,
}

impl Component {
    pub fn new(id: i64, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
        }
    }

    /// Cost of `quantity` units at this component's catalog price
    ///
    /// Fails instead of overflowing when the product leaves the decimal range.
    pub fn cost_of(&self, quantity: Decimal) -> Result<Decimal, QuoteError> {
        quantity
            .checked_mul(self.unit_price)
            .ok_or_else(|| QuoteError::too_large(format!("components[{}]", self.id)))
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_of() {
        let cmp = Component::new(1, "ATmega328", dec!(2.0));
        assert_eq!(cmp.cost_of(dec!(3)).unwrap(), dec!(6.0));
    }

    #[test]
    fn test_zero_price_is_valid() {
        let water = Component::new(11, "Water", Decimal::ZERO);
        assert_eq!(water.cost_of(dec!(5)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let cmp = Component::new(4, "Bulk resistor", dec!(10));
        let err = cmp.cost_of(Decimal::MAX).unwrap_err();
        assert_eq!(err.field(), Some("components[4]"));
    }

    #[test]
    fn test_display() {
        let cmp = Component::new(7, "DC-DC Converter", dec!(0.2));
        assert_eq!(cmp.to_string(), "DC-DC Converter (7)");
    }
}
