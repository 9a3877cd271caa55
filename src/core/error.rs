//! Error taxonomy for catalog, rollup and quotation operations

use miette::Diagnostic;
use thiserror::Error;

use crate::core::project::ProjectError;
use crate::yaml::YamlError;

/// Errors raised while building or storing quotation data
#[derive(Debug, Error, Diagnostic)]
pub enum QuoteError {
    /// Bad input supplied at the boundary (negative values, unknown IDs)
    #[error("invalid {field}: {message}")]
    #[diagnostic(
        code(bomq::validation),
        help("fix the selection or command arguments and try again")
    )]
    Validation { field: String, message: String },

    /// Catalog data contradicts itself (e.g. a BOM line with no component)
    #[error("catalog integrity error: {message}")]
    #[diagnostic(
        code(bomq::integrity),
        help("the quotation was not produced; repair the catalog or run 'bomq reset'")
    )]
    Integrity { message: String },

    /// An explicitly requested record does not exist
    #[error("{kind} {id} not found")]
    #[diagnostic(
        code(bomq::not_found),
        help("use 'bomq cmp list' or 'bomq asm list' to see valid IDs")
    )]
    NotFound { kind: &'static str, id: i64 },

    #[error("catalog store error: {0}")]
    #[diagnostic(code(bomq::store))]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    #[diagnostic(code(bomq::project))]
    Project(#[from] ProjectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}

impl QuoteError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        QuoteError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        QuoteError::Integrity {
            message: message.into(),
        }
    }

    /// Arithmetic on `field` overflowed the decimal range
    pub fn too_large(field: impl Into<String>) -> Self {
        Self::validation(field, "value too large")
    }

    pub fn component_not_found(id: i64) -> Self {
        QuoteError::NotFound {
            kind: "component",
            id,
        }
    }

    pub fn assembly_not_found(id: i64) -> Self {
        QuoteError::NotFound {
            kind: "assembly",
            id,
        }
    }

    /// The offending field for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            QuoteError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
