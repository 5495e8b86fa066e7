#![deny(missing_docs)]

//! # CDD Compiler CLI
//!
//! Command Line Interface for the document compiler generator.
//!
//! Supported Commands:
//! - `generate`: Domain model -> compiler source unit.
//! - `check`: Validates a domain model and summarizes its types.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod check;
mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Document compiler generator")]
struct Cli {
    /// Log generation phases (overridden by RUST_LOG).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the compiler unit for a domain model.
    Generate(generate::GenerateArgs),
    /// Validate a domain model and summarize its types.
    Check(check::CheckArgs),
}

/// Installs the stderr log subscriber.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
    }

    Ok(())
}
