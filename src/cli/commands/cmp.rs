//! `bomq cmp` command - Component management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_store, parse_decimal, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::document::format_amount;
use crate::core::Config;
use crate::entities::Component;

#[derive(Subcommand, Debug)]
pub enum CmpCommands {
    /// List components in catalog order
    List(ListArgs),

    /// Add a new component
    New(NewArgs),

    /// Show a component and the assemblies that use it
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only components whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Component name
    #[arg(long)]
    pub name: String,

    /// Unit price (decimal, not negative)
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Component ID
    pub id: i64,
}

pub fn run(cmd: CmpCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CmpCommands::List(args) => run_list(args, global),
        CmpCommands::New(args) => run_new(args, global),
        CmpCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load(Some(&project));

    let needle = args.search.as_deref().map(str::to_lowercase);
    let mut components: Vec<Component> = store
        .list_components()?
        .into_iter()
        .filter(|c| match &needle {
            Some(n) => c.name.to_lowercase().contains(n),
            None => true,
        })
        .collect();
    if let Some(limit) = args.limit {
        components.truncate(limit);
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&components).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&components).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(["id", "name", "unit_price"])
                .into_diagnostic()?;
            for cmp in &components {
                writer
                    .write_record([cmp.id.to_string(), cmp.name.clone(), cmp.unit_price.to_string()])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Unit price"]);
            for cmp in &components {
                builder.push_record([
                    cmp.id.to_string(),
                    cmp.name.clone(),
                    format_amount(cmp.unit_price, config.currency()),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));
        }
        OutputFormat::Id => {
            for cmp in &components {
                println!("{}", cmp.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<6} {:<40} {:>16}",
                style("ID").bold(),
                style("NAME").bold(),
                style("UNIT PRICE").bold()
            );
            for cmp in &components {
                println!(
                    "{:<6} {:<40} {:>16}",
                    style(cmp.id).cyan(),
                    truncate_str(&cmp.name, 40),
                    format_amount(cmp.unit_price, config.currency())
                );
            }
            if !global.quiet {
                println!();
                println!("{} component(s) found.", style(components.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, mut store) = open_store(global)?;
    let price = parse_decimal(&args.price, "unit_price")?;
    let id = store.insert_component(&args.name, price)?;

    if global.quiet || global.format == OutputFormat::Id {
        println!("{}", id);
    } else {
        println!(
            "{} Created component {}",
            style("✓").green(),
            style(id).cyan()
        );
        println!("   {} @ {}", style(args.name.trim()).yellow(), price.normalize());
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load(Some(&project));
    let cmp = store.get_component(args.id)?;

    match global.format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&cmp).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cmp).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", cmp.id);
        }
        _ => {
            let used_by: Vec<String> = store
                .list_assemblies()?
                .into_iter()
                .filter(|a| a.uses_component(cmp.id))
                .map(|a| format!("{} ({})", a.name, a.id))
                .collect();

            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(cmp.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&cmp.name).yellow());
            println!(
                "{}: {}",
                style("Unit price").bold(),
                format_amount(cmp.unit_price, config.currency())
            );
            println!("{}", style("─".repeat(60)).dim());
            if used_by.is_empty() {
                println!("{}", style("Not used by any assembly").dim());
            } else {
                println!("{}:", style("Used by").bold());
                for name in used_by {
                    println!("  {}", name);
                }
            }
        }
    }
    Ok(())
}
