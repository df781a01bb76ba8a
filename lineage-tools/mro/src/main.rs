//! Lineage MRO Inspector Binary
//!
//! Run with: `lineage-mro [OPTIONS] <COMMAND>`

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lineage_mro::commands::{build_config, cmd_check, cmd_lookup, cmd_mro};
use lineage_mro::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "lineage-mro")]
#[command(about = "Inspect C3 method resolution orders of class hierarchies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the configuration file)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Universal root for documents that do not name one
    #[arg(long, global = true)]
    root: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the method resolution order of classes
    Mro {
        /// Hierarchy document (TOML, or JSON with a .json extension)
        file: PathBuf,

        /// Classes to linearize
        #[arg(value_name = "CLASS")]
        classes: Vec<String>,

        /// Linearize every class in the document
        #[arg(short, long, conflicts_with = "classes")]
        all: bool,
    },

    /// Validate a document and linearize every class
    Check {
        /// Hierarchy document
        file: PathBuf,
    },

    /// Find the class that provides a name
    Lookup {
        /// Hierarchy document
        file: PathBuf,

        /// Class the lookup starts from
        class: String,

        /// Name to resolve
        name: String,

        /// Only consider classes after this one in the MRO (a `super` call)
        #[arg(long)]
        after: Option<String>,
    },

    /// Print the default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = build_config(cli.config.as_deref(), cli.format, cli.root.as_deref())?;

    match &cli.command {
        Commands::Mro { file, classes, all } => {
            print!("{}", cmd_mro(&config, file, classes, *all)?);
        }
        Commands::Check { file } => {
            let outcome = cmd_check(&config, file)?;
            if outcome.exit_code() != 0 {
                std::process::exit(outcome.exit_code());
            }
            if let Some(output) = &outcome.output {
                print!("{}", output);
            }
        }
        Commands::Lookup {
            file,
            class,
            name,
            after,
        } => {
            println!("{}", cmd_lookup(&config, file, class, name, after.as_deref())?);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&Config::default())?);
        }
    }
    Ok(())
}
