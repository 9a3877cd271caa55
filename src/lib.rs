//! bomq: assembly cost rollup and quotation toolkit
//!
//! Keeps a catalog of priced components and assemblies (bills of
//! materials) in SQLite, rolls a selection of assemblies up into aggregate
//! component demand and turns that demand into a quotation document.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
