//! `bomq quote` command - build quotations from assembly selections

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::helpers::{
    open_store, parse_decimal, parse_id_count, parse_id_quantity, write_output,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::document::{format_amount, DocumentOptions, QuotationDocument};
use crate::core::error::QuoteError;
use crate::core::project::Project;
use crate::core::quotation::{build_quotation, LaborModel};
use crate::core::Config;
use crate::entities::Selection;

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// Roll a selection up and render the quotation
    Build(BuildArgs),

    /// Print an example selection file
    Template,
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Selection YAML file (relative names are also looked up in .bomq/selections/)
    #[arg(long, short = 's')]
    pub selection: Option<PathBuf>,

    /// Pick an assembly as ASM_ID=MULTIPLICITY (repeatable)
    #[arg(long = "pick", value_name = "ASM=N")]
    pub picks: Vec<String>,

    /// Add an extra component line as CMP_ID=QTY (repeatable)
    #[arg(long = "extra", value_name = "CMP=QTY")]
    pub extras: Vec<String>,

    /// Record an extra line that is not included in the quotation
    #[arg(long = "exclude-extra", value_name = "CMP=QTY")]
    pub excluded_extras: Vec<String>,

    /// Replace a component's assembly-derived quantity as CMP_ID=QTY
    #[arg(long = "override", value_name = "CMP=QTY")]
    pub overrides: Vec<String>,

    /// Remove a component from the quotation entirely
    #[arg(long = "drop", value_name = "CMP")]
    pub drops: Vec<i64>,

    /// People billed for labor
    #[arg(long, allow_hyphen_values = true)]
    pub headcount: Option<i64>,

    /// Labor cost per person (default from config)
    #[arg(long, allow_hyphen_values = true)]
    pub labor_rate: Option<String>,

    /// Customer shown on the cover block
    #[arg(long)]
    pub customer: Option<String>,

    /// Quotation number shown on the cover block
    #[arg(long)]
    pub quotation_no: Option<String>,

    /// Quotation date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Write the quotation to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(cmd: QuoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        QuoteCommands::Build(args) => run_build(args, global),
        QuoteCommands::Template => {
            print!("{}", Selection::template());
            Ok(())
        }
    }
}

fn run_build(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load(Some(&project));
    let format = resolve_format(global.format, args.output.as_deref(), &config)?;

    let selection = build_selection(&args, &project)?;
    let rate = match &args.labor_rate {
        Some(raw) => parse_decimal(raw, "labor_rate")?,
        None => config.labor_rate(),
    };
    let labor = LaborModel::new(rate)?;

    let (catalog, assemblies) = store.snapshot()?;
    let quotation = build_quotation(&catalog, &assemblies, &selection, &labor)?;

    let mut options =
        DocumentOptions::from_config(&config, args.date.unwrap_or_else(|| Local::now().date_naive()));
    if let Some(customer) = &args.customer {
        options.customer = customer.clone();
    }
    if let Some(number) = &args.quotation_no {
        options.quotation_no = number.clone();
    }
    let currency = options.currency.clone();
    let document = QuotationDocument::new(&quotation, options)?;

    let content = match format {
        OutputFormat::Csv => document.to_csv()?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&quotation).into_diagnostic()?;
            json.push('\n');
            json
        }
        _ => document.to_markdown(),
    };

    write_output(&content, args.output.as_deref(), global.quiet)?;

    if args.output.is_some() && !global.quiet {
        println!(
            "   {} {}",
            style("Grand total:").bold(),
            style(format_amount(quotation.grand_total, &currency)).green()
        );
    }
    Ok(())
}

/// Start from the selection file (if any) and layer the command-line choices on top
fn build_selection(args: &BuildArgs, project: &Project) -> Result<Selection, QuoteError> {
    let mut selection = match &args.selection {
        Some(path) => Selection::load(&resolve_selection_path(path, project))?,
        None => Selection::new(),
    };

    for raw in &args.picks {
        let (id, multiplicity) = parse_id_count(raw, "--pick")?;
        selection = selection.pick(id, multiplicity);
    }
    for raw in &args.extras {
        let (id, qty) = parse_id_quantity(raw, "--extra")?;
        selection = selection.extra(id, qty, true);
    }
    for raw in &args.excluded_extras {
        let (id, qty) = parse_id_quantity(raw, "--exclude-extra")?;
        selection = selection.extra(id, qty, false);
    }
    for raw in &args.overrides {
        let (id, qty) = parse_id_quantity(raw, "--override")?;
        selection = selection.override_quantity(id, qty, true);
    }
    for id in &args.drops {
        selection = selection.override_quantity(*id, rust_decimal::Decimal::ZERO, false);
    }
    if let Some(headcount) = args.headcount {
        selection = selection.with_headcount(headcount);
    }

    Ok(selection)
}

fn resolve_selection_path(path: &Path, project: &Project) -> PathBuf {
    if path.is_relative() && !path.exists() {
        let candidate = project.selections_dir().join(path);
        if candidate.exists() {
            return candidate;
        }
    }
    path.to_path_buf()
}

/// Quotations render as csv, md or json
///
/// `auto` looks at the output file extension, then `default_format` in
/// config, and falls back to markdown.
fn resolve_format(
    requested: OutputFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<OutputFormat, QuoteError> {
    let format = match requested {
        OutputFormat::Auto => output
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_name)
            .or_else(|| {
                config
                    .default_format
                    .as_deref()
                    .and_then(OutputFormat::from_name)
            })
            .unwrap_or(OutputFormat::Md),
        f => f,
    };

    match format {
        OutputFormat::Csv | OutputFormat::Md | OutputFormat::Json => Ok(format),
        OutputFormat::Auto => Ok(OutputFormat::Md),
        other => Err(QuoteError::validation(
            "--format",
            format!("quotations render as csv, md or json (got {:?})", other).to_lowercase(),
        )),
    }
}
