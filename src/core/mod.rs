//! Core module - catalog, rollup engine, quotation and project plumbing

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod project;
pub mod quotation;
pub mod rollup;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{AssemblyCatalog, Catalog};
pub use config::Config;
pub use document::{DocumentOptions, QuotationDocument};
pub use error::QuoteError;
pub use project::{Project, ProjectError};
pub use quotation::{build_quotation, LaborModel, Quotation};
pub use rollup::{rollup, AggregateDemand, DemandEntry};
pub use store::CatalogStore;
