//! Database schema initialization

use rusqlite::params;

use super::{CatalogStore, SCHEMA_VERSION};
use crate::core::error::QuoteError;

impl CatalogStore {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<(), QuoteError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Priced catalog components
            CREATE TABLE IF NOT EXISTS components (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                unit_price TEXT NOT NULL
            );

            -- Assemblies (BOM headers)
            CREATE TABLE IF NOT EXISTS assemblies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created TEXT NOT NULL
            );

            -- BOM lines, ordered within an assembly by line_no
            CREATE TABLE IF NOT EXISTS bom_lines (
                assembly_id INTEGER NOT NULL,
                line_no INTEGER NOT NULL,
                component_id INTEGER NOT NULL,
                quantity_per_unit TEXT NOT NULL,
                PRIMARY KEY (assembly_id, line_no),
                FOREIGN KEY (assembly_id) REFERENCES assemblies(id),
                FOREIGN KEY (component_id) REFERENCES components(id)
            );
            CREATE INDEX IF NOT EXISTS idx_bom_lines_component ON bom_lines(component_id);
            "#,
        )?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Drop all tables (keeping the database file)
    pub(super) fn drop_tables(&mut self) -> Result<(), QuoteError> {
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS bom_lines;
            DROP TABLE IF EXISTS assemblies;
            DROP TABLE IF EXISTS components;
            DROP TABLE IF EXISTS schema_version;
            "#,
        )?;
        Ok(())
    }
}
