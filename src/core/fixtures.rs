//! Shared catalog fixtures for unit tests

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::core::catalog::{AssemblyCatalog, Catalog};
use crate::entities::{Assembly, BomLine, Component};

pub const C1: i64 = 1;
pub const C2: i64 = 2;
pub const C3: i64 = 3;
pub const A1: i64 = 10;
pub const A2: i64 = 20;
pub const EMPTY: i64 = 30;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// C1 at 2.00, C2 at 0.50, C3 (water) at 0.00
pub fn catalog() -> Catalog {
    Catalog::new(vec![
        Component::new(C1, "C1", dec!(2.00)),
        Component::new(C2, "C2", dec!(0.50)),
        Component::new(C3, "Water", dec!(0.00)),
    ])
    .unwrap()
}

/// A1 = [C1 x1, C2 x2]; A2 = [C2 x1, C3 x4]; an empty-BOM assembly
pub fn assemblies() -> AssemblyCatalog {
    AssemblyCatalog::new(vec![
        Assembly::new(
            A1,
            "A1",
            date(),
            vec![BomLine::new(C1, dec!(1)), BomLine::new(C2, dec!(2))],
        ),
        Assembly::new(
            A2,
            "A2",
            date(),
            vec![BomLine::new(C2, dec!(1)), BomLine::new(C3, dec!(4))],
        ),
        Assembly::new(EMPTY, "Placeholder", date(), vec![]),
    ])
    .unwrap()
}
