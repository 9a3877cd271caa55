//! `bomq reset` command - restore the default catalog

use console::style;
use miette::Result;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct ResetArgs {
    /// Confirm that every component and assembly will be replaced
    #[arg(long)]
    pub yes: bool,
}

pub fn run(args: ResetArgs, global: &GlobalOpts) -> Result<()> {
    if !args.yes {
        return Err(miette::miette!(
            help = "re-run with --yes to confirm",
            "reset replaces the whole catalog with the default one"
        ));
    }

    let (_project, mut store) = open_store(global)?;
    store.reset_to_defaults()?;

    if !global.quiet {
        println!(
            "{} Catalog reset: {} components, {} assemblies",
            style("✓").green(),
            style(store.component_count()?).cyan(),
            style(store.assembly_count()?).cyan()
        );
    }
    Ok(())
}
