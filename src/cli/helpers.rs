//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::cli::GlobalOpts;
use crate::core::error::QuoteError;
use crate::core::project::Project;
use crate::core::store::CatalogStore;

/// Locate the project named by `--project` or found above the CWD
pub fn open_project(global: &GlobalOpts) -> Result<Project, QuoteError> {
    Ok(Project::locate(global.project.as_deref())?)
}

/// Locate the project and open its catalog store
pub fn open_store(global: &GlobalOpts) -> Result<(Project, CatalogStore), QuoteError> {
    let project = open_project(global)?;
    let store = CatalogStore::open(&project)?;
    Ok((project, store))
}

/// Parse a decimal argument; `field` names the argument in the error
pub fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, QuoteError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| QuoteError::validation(field, format!("'{}' is not a decimal number", raw)))
}

fn split_pair<'a>(raw: &'a str, flag: &str) -> Result<(i64, &'a str), QuoteError> {
    let (id, value) = raw.split_once('=').ok_or_else(|| {
        QuoteError::validation(flag, format!("expected ID=VALUE, got '{}'", raw))
    })?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| QuoteError::validation(flag, format!("'{}' is not a numeric ID", id.trim())))?;
    Ok((id, value.trim()))
}

/// Parse `ASM=N` for `--pick`
pub fn parse_id_count(raw: &str, flag: &str) -> Result<(i64, i64), QuoteError> {
    let (id, value) = split_pair(raw, flag)?;
    let count = value
        .parse::<i64>()
        .map_err(|_| QuoteError::validation(flag, format!("'{}' is not a whole number", value)))?;
    Ok((id, count))
}

/// Parse `ID=QTY` with a decimal quantity
pub fn parse_id_quantity(raw: &str, flag: &str) -> Result<(i64, Decimal), QuoteError> {
    let (id, value) = split_pair(raw, flag)?;
    Ok((id, parse_decimal(value, flag)?))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                println!(
                    "{} Quotation written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}
