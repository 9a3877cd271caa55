//! `bomq asm` command - Assembly (BOM) management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_store, parse_id_quantity, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::resolve_line;
use crate::core::document::{format_amount, format_quantity};
use crate::core::quotation::assembly_unit_cost;
use crate::core::Config;
use crate::entities::{Assembly, BomLine};

#[derive(Subcommand, Debug)]
pub enum AsmCommands {
    /// List assemblies with their intrinsic unit cost
    List(ListArgs),

    /// Add a new assembly with its bill of materials
    New(NewArgs),

    /// Show an assembly's bill of materials
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only assemblies whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Assembly name
    #[arg(long)]
    pub name: String,

    /// BOM line as COMPONENT_ID=QTY_PER_UNIT (repeatable, kept in order)
    #[arg(long = "line", value_name = "CMP=QTY")]
    pub lines: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Assembly ID
    pub id: i64,
}

/// Assembly with its derived unit cost, for list output
#[derive(Serialize)]
struct AssemblyRow<'a> {
    #[serde(flatten)]
    assembly: &'a Assembly,
    unit_cost: rust_decimal::Decimal,
}

pub fn run(cmd: AsmCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AsmCommands::List(args) => run_list(args, global),
        AsmCommands::New(args) => run_new(args, global),
        AsmCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load(Some(&project));
    let (catalog, assemblies) = store.snapshot()?;

    let needle = args.search.as_deref().map(str::to_lowercase);
    let mut rows = Vec::new();
    for asm in assemblies.iter() {
        if let Some(n) = &needle {
            if !asm.name.to_lowercase().contains(n) {
                continue;
            }
        }
        rows.push(AssemblyRow {
            assembly: asm,
            unit_cost: assembly_unit_cost(&catalog, &assemblies, asm.id)?,
        });
    }
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&rows).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(["id", "name", "bom_lines", "unit_cost", "created"])
                .into_diagnostic()?;
            for row in &rows {
                writer
                    .write_record([
                        row.assembly.id.to_string(),
                        row.assembly.name.clone(),
                        row.assembly.bom_line_count().to_string(),
                        row.unit_cost.to_string(),
                        row.assembly.created.to_string(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Lines", "Unit cost", "Created"]);
            for row in &rows {
                builder.push_record([
                    row.assembly.id.to_string(),
                    row.assembly.name.clone(),
                    row.assembly.bom_line_count().to_string(),
                    format_amount(row.unit_cost, config.currency()),
                    row.assembly.created.to_string(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));
        }
        OutputFormat::Id => {
            for row in &rows {
                println!("{}", row.assembly.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<6} {:<36} {:>5} {:>16} {:<10}",
                style("ID").bold(),
                style("NAME").bold(),
                style("LINES").bold(),
                style("UNIT COST").bold(),
                style("CREATED").bold()
            );
            for row in &rows {
                println!(
                    "{:<6} {:<36} {:>5} {:>16} {:<10}",
                    style(row.assembly.id).cyan(),
                    truncate_str(&row.assembly.name, 36),
                    row.assembly.bom_line_count(),
                    format_amount(row.unit_cost, config.currency()),
                    style(row.assembly.created).dim()
                );
            }
            if !global.quiet {
                println!();
                println!("{} assembly(ies) found.", style(rows.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, mut store) = open_store(global)?;

    let bom = args
        .lines
        .iter()
        .map(|raw| parse_id_quantity(raw, "--line").map(|(id, qty)| BomLine::new(id, qty)))
        .collect::<Result<Vec<_>, _>>()?;

    let id = store.insert_assembly(&args.name, &bom)?;

    if global.quiet || global.format == OutputFormat::Id {
        println!("{}", id);
    } else {
        println!(
            "{} Created assembly {}",
            style("✓").green(),
            style(id).cyan()
        );
        println!(
            "   {} with {} BOM line(s)",
            style(args.name.trim()).yellow(),
            bom.len()
        );
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load(Some(&project));
    let (catalog, assemblies) = store.snapshot()?;
    let asm = assemblies
        .get(args.id)
        .ok_or_else(|| crate::core::QuoteError::assembly_not_found(args.id))?;

    match global.format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(asm).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(asm).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", asm.id);
        }
        _ => {
            let currency = config.currency();
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(asm.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&asm.name).yellow());
            println!("{}: {}", style("Created").bold(), asm.created);
            println!("{}", style("─".repeat(60)).dim());

            if asm.bom.is_empty() {
                println!("{}", style("Empty bill of materials").dim());
            } else {
                let mut builder = Builder::default();
                builder.push_record(["Component", "Qty/unit", "Unit price", "Line cost"]);
                for line in &asm.bom {
                    let cmp = resolve_line(&catalog, asm, line)?;
                    builder.push_record([
                        cmp.to_string(),
                        format_quantity(line.quantity_per_unit),
                        format_amount(cmp.unit_price, currency),
                        format_amount(cmp.cost_of(line.quantity_per_unit)?, currency),
                    ]);
                }
                println!("{}", builder.build().with(Style::markdown()));
            }

            let unit_cost = assembly_unit_cost(&catalog, &assemblies, asm.id)?;
            println!();
            println!(
                "{}: {}",
                style("Unit cost").bold(),
                style(format_amount(unit_cost, currency)).green()
            );
        }
    }
    Ok(())
}
