//! Insert and query operations on the catalog store

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{parse_date, parse_decimal, CatalogStore, DATE_FORMAT};
use crate::core::error::QuoteError;
use crate::entities::{Assembly, BomLine, Component};

impl CatalogStore {
    /// Add a component to the catalog, returning its new ID
    pub fn insert_component(&mut self, name: &str, unit_price: Decimal) -> Result<i64, QuoteError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuoteError::validation("name", "component name must not be empty"));
        }
        if unit_price < Decimal::ZERO {
            return Err(QuoteError::validation(
                "unit_price",
                format!("price must not be negative (got {})", unit_price),
            ));
        }

        self.conn.execute(
            "INSERT INTO components (name, unit_price) VALUES (?1, ?2)",
            params![name, unit_price.normalize().to_string()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, name, %unit_price, "component added");
        Ok(id)
    }

    /// All components in declaration order
    pub fn list_components(&self) -> Result<Vec<Component>, QuoteError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, unit_price FROM components ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Component {
                id: row.get(0)?,
                name: row.get(1)?,
                unit_price: parse_decimal(2, row.get(2)?)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_component(&self, id: i64) -> Result<Component, QuoteError> {
        self.conn
            .query_row(
                "SELECT id, name, unit_price FROM components WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Component {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        unit_price: parse_decimal(2, row.get(2)?)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| QuoteError::component_not_found(id))
    }

    /// Add an assembly with its BOM, dated today
    pub fn insert_assembly(&mut self, name: &str, bom_lines: &[BomLine]) -> Result<i64, QuoteError> {
        self.insert_assembly_dated(name, Local::now().date_naive(), bom_lines)
    }

    /// Add an assembly with an explicit submission date
    ///
    /// Runs in one transaction: either the header and every line land, or
    /// nothing does.
    pub fn insert_assembly_dated(
        &mut self,
        name: &str,
        created: NaiveDate,
        bom_lines: &[BomLine],
    ) -> Result<i64, QuoteError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuoteError::validation("name", "assembly name must not be empty"));
        }
        for (i, line) in bom_lines.iter().enumerate() {
            if line.quantity_per_unit < Decimal::ZERO {
                return Err(QuoteError::validation(
                    format!("bom_lines[{}].quantity_per_unit", i),
                    format!("quantity must not be negative (got {})", line.quantity_per_unit),
                ));
            }
        }

        let tx = self.conn.transaction()?;
        {
            let mut exists = tx.prepare("SELECT 1 FROM components WHERE id = ?1")?;
            for line in bom_lines {
                if !exists.exists(params![line.component_id])? {
                    return Err(QuoteError::integrity(format!(
                        "BOM line references component {} which is not in the catalog",
                        line.component_id
                    )));
                }
            }
        }

        tx.execute(
            "INSERT INTO assemblies (name, created) VALUES (?1, ?2)",
            params![name, created.format(DATE_FORMAT).to_string()],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut insert = tx.prepare(
                "INSERT INTO bom_lines (assembly_id, line_no, component_id, quantity_per_unit)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (line_no, line) in bom_lines.iter().enumerate() {
                insert.execute(params![
                    id,
                    line_no as i64,
                    line.component_id,
                    line.quantity_per_unit.normalize().to_string()
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(id, name, lines = bom_lines.len(), "assembly added");
        Ok(id)
    }

    /// All assemblies with their BOMs, in declaration order
    pub fn list_assemblies(&self) -> Result<Vec<Assembly>, QuoteError> {
        let mut boms = self.all_bom_lines()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created FROM assemblies ORDER BY id")?;
        let headers = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    parse_date(2, row.get(2)?)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(headers
            .into_iter()
            .map(|(id, name, created)| {
                let bom = boms.remove(&id).unwrap_or_default();
                Assembly::new(id, name, created, bom)
            })
            .collect())
    }

    pub fn get_assembly(&self, id: i64) -> Result<Assembly, QuoteError> {
        let header = self
            .conn
            .query_row(
                "SELECT id, name, created FROM assemblies WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        parse_date(2, row.get(2)?)?,
                    ))
                },
            )
            .optional()?;

        let (id, name, created) = header.ok_or_else(|| QuoteError::assembly_not_found(id))?;
        let bom = self.bom_lines_for(id)?;
        Ok(Assembly::new(id, name, created, bom))
    }

    /// BOM lines of one assembly in line order
    pub fn list_bom(&self, assembly_id: i64) -> Result<Vec<BomLine>, QuoteError> {
        let exists: bool = self
            .conn
            .prepare("SELECT 1 FROM assemblies WHERE id = ?1")?
            .exists(params![assembly_id])?;
        if !exists {
            return Err(QuoteError::assembly_not_found(assembly_id));
        }
        self.bom_lines_for(assembly_id)
    }

    pub fn component_count(&self) -> Result<i64, QuoteError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM components", [], |row| row.get(0))?)
    }

    pub fn assembly_count(&self) -> Result<i64, QuoteError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM assemblies", [], |row| row.get(0))?)
    }

    fn bom_lines_for(&self, assembly_id: i64) -> Result<Vec<BomLine>, QuoteError> {
        let mut stmt = self.conn.prepare(
            "SELECT component_id, quantity_per_unit FROM bom_lines
             WHERE assembly_id = ?1 ORDER BY line_no",
        )?;
        let rows = stmt.query_map(params![assembly_id], |row| {
            Ok(BomLine::new(row.get(0)?, parse_decimal(1, row.get(1)?)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn all_bom_lines(&self) -> Result<HashMap<i64, Vec<BomLine>>, QuoteError> {
        let mut stmt = self.conn.prepare(
            "SELECT assembly_id, component_id, quantity_per_unit FROM bom_lines
             ORDER BY assembly_id, line_no",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                BomLine::new(row.get(1)?, parse_decimal(2, row.get(2)?)?),
            ))
        })?;

        let mut boms: HashMap<i64, Vec<BomLine>> = HashMap::new();
        for row in rows {
            let (assembly_id, line) = row?;
            boms.entry(assembly_id).or_default().push(line);
        }
        Ok(boms)
    }
}
