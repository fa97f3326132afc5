//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{cart, item, query};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "gear")]
#[command(author, version, about = "Local-first inventory and lending tracker for instruments and gear")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new inventory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Register, edit, lend and return items
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Stage several items and lend them in one go
    #[command(subcommand)]
    Cart(cart::CartCommands),

    /// Search items by any field
    Search {
        /// Text to look for (case-insensitive)
        #[arg(default_value = "")]
        query: String,
    },

    /// Show inventory overview
    Status,

    /// Write a dated backup of the inventory
    Export {
        /// Directory for the backup file (defaults to .gear/backups)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print the CSV to stdout instead of writing a file
        #[arg(long, conflicts_with = "dir")]
        stdout: bool,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    super::output::init_colors();

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format,
    };
    let output = Output::new(format);

    tracing::debug!("gear starting");

    match cli.command {
        Commands::Init { path } => {
            let project = Project::init(&path)?;
            tracing::debug!(dir = %project.gear_dir().display(), "created .gear directory");
            output.success(&format!(
                "Initialized gear inventory at {}",
                project.root().display()
            ));
        }

        Commands::Item(cmd) => item::run(cmd, &output)?,
        Commands::Cart(cmd) => cart::run(cmd, &output)?,

        Commands::Search { query } => query::search(&output, &query)?,
        Commands::Status => query::status(&output)?,
        Commands::Export { dir, stdout } => query::export(&output, dir, stdout)?,
    }

    tracing::debug!("command completed");
    Ok(())
}

/// Routes `tracing` events to stderr; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default = if verbose { "gear_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
