//! `bomq init` command - Initialize a new bomq project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::error::QuoteError;
use crate::core::project::{Project, ProjectError};
use crate::core::store::CatalogStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Force initialization even if .bomq/ already exists
    #[arg(long)]
    pub force: bool,

    /// Create an empty catalog instead of the default electronics catalog
    #[arg(long)]
    pub empty: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    let project = match project {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} bomq project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("bomq init --force").yellow());
            return Ok(());
        }
        Err(e) => return Err(QuoteError::from(e).into()),
    };

    let store = CatalogStore::open_path(&project.catalog_path(), !args.empty)?;
    let components = store.component_count()?;
    let assemblies = store.assembly_count()?;

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Initialized bomq project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!(
        "   catalog: {} components, {} assemblies",
        style(components).cyan(),
        style(assemblies).cyan()
    );
    println!();
    println!("Created project structure:");
    print_structure(project.root());
    println!();
    println!("Next steps:");
    println!("  {} List assemblies", style("bomq asm list").yellow());
    println!(
        "  {} Print an example selection",
        style("bomq quote template").yellow()
    );
    println!(
        "  {} Build a quotation",
        style("bomq quote build --pick 1=3 --headcount 2").yellow()
    );
    Ok(())
}

fn print_structure(root: &Path) {
    let entries = [
        ".bomq/",
        ".bomq/config.yaml",
        ".bomq/catalog.db",
        ".bomq/selections/",
    ];

    for entry in entries {
        if root.join(entry).exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
