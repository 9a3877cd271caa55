//! Entity type definitions
//!
//! bomq works with three kinds of data:
//!
//! - [`Component`] - priced catalog parts
//! - [`Assembly`] - named bills of materials over components
//! - [`Selection`] - the operator's picks, extras, overrides and headcount
//!   for a single quotation

pub mod assembly;
pub mod component;
pub mod selection;

pub use assembly::{Assembly, BomLine};
pub use component::Component;
pub use selection::{ExtraLine, Override, Selection};
