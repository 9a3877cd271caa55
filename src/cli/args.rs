//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    asm::AsmCommands, cmp::CmpCommands, completions::CompletionsArgs, init::InitArgs,
    quote::QuoteCommands, reset::ResetArgs,
};

#[derive(Parser)]
#[command(name = "bomq")]
#[command(author, version, about = "Assembly cost rollup and quotation toolkit")]
#[command(long_about = "Keeps a catalog of priced components and assemblies, rolls a selection of assemblies up into component demand and renders the result as a quotation.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .bomq/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new bomq project with a seeded catalog
    Init(InitArgs),

    /// Reset the catalog to the default electronics catalog
    Reset(ResetArgs),

    /// Component management (priced parts)
    #[command(subcommand)]
    Cmp(CmpCommands),

    /// Assembly management (bills of materials)
    #[command(subcommand)]
    Asm(AsmCommands),

    /// Build quotations from assembly selections
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists, md for quotes)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Parse a format name from config (`csv`, `md`, `json`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}
