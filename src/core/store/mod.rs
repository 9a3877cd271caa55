//! SQLite-backed catalog store
//!
//! Holds components, assemblies and their BOM lines. The store only ever
//! appends: there are no update or delete operations apart from the
//! wholesale reset to the default catalog.
//!
//! Prices and quantities are stored as decimal TEXT so values round-trip
//! exactly; SQLite REAL would turn 0.1 into 0.1000000000000000055.

mod defaults;
mod queries;
mod schema;

pub use defaults::DefaultCatalog;

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::core::catalog::{AssemblyCatalog, Catalog};
use crate::core::error::QuoteError;
use crate::core::project::Project;

/// Current schema version - tables are recreated on mismatch
const SCHEMA_VERSION: i32 = 1;

/// Date format for `assemblies.created`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The catalog store backed by SQLite
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open the catalog of a project, seeding defaults on first use
    pub fn open(project: &Project) -> Result<Self, QuoteError> {
        Self::open_path(&project.catalog_path(), true)
    }

    /// Open a database file
    ///
    /// A brand-new file gets the schema and, when `seed` is set, the
    /// default catalog.
    pub fn open_path(path: &Path, seed: bool) -> Result<Self, QuoteError> {
        let needs_init = !path.exists();
        let conn = Connection::open(path)?;
        let mut store = Self::from_connection(conn)?;

        if needs_init {
            store.init_schema()?;
            if seed {
                store.seed_defaults()?;
            }
        } else if store.needs_schema_rebuild()? {
            tracing::warn!(path = %path.display(), "catalog schema out of date, recreating");
            store.drop_tables()?;
            store.init_schema()?;
            if seed {
                store.seed_defaults()?;
            }
        }

        Ok(store)
    }

    /// Empty in-memory store with the schema applied
    pub fn open_in_memory() -> Result<Self, QuoteError> {
        let mut store = Self::from_connection(Connection::open_in_memory()?)?;
        store.init_schema()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self, QuoteError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Check if schema version matches current version
    fn needs_schema_rebuild(&self) -> Result<bool, QuoteError> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }

    /// Drop everything and reload the default catalog
    pub fn reset_to_defaults(&mut self) -> Result<(), QuoteError> {
        self.drop_tables()?;
        self.init_schema()?;
        self.seed_defaults()?;
        tracing::info!("catalog reset to defaults");
        Ok(())
    }

    /// Snapshot the whole catalog for a rollup
    pub fn snapshot(&self) -> Result<(Catalog, AssemblyCatalog), QuoteError> {
        let catalog = Catalog::new(self.list_components()?)?;
        let assemblies = AssemblyCatalog::new(self.list_assemblies()?)?;
        assemblies.check_references(&catalog)?;
        tracing::debug!(
            components = catalog.len(),
            assemblies = assemblies.len(),
            "catalog snapshot taken"
        );
        Ok((catalog, assemblies))
    }
}

fn parse_decimal(column: usize, text: String) -> rusqlite::Result<Decimal> {
    Decimal::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_date(column: usize, text: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
