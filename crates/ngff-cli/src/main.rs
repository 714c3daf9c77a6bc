//! # ngff CLI entry point
//!
//! Parses command-line arguments, loads settings and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ngff_cli::array::{run_array, ArrayArgs};
use ngff_cli::schema_url::{run_schema_url, SchemaUrlArgs};
use ngff_cli::validate::{run_validate, ValidateArgs};
use ngff_cli::Settings;
use ngff_schema::SchemaLocator;

/// OME-NGFF validator
///
/// Validates OME-Zarr images, plates, wells and labels against the
/// published JSON schemas of the NGFF version they declare.
#[derive(Parser, Debug)]
#[command(name = "ngff", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an NGFF hierarchy, one report per node.
    Validate(ValidateArgs),

    /// Print the schema URLs for a kind and version.
    SchemaUrl(SchemaUrlArgs),

    /// Summarize the metadata of a Zarr array.
    Array(ArrayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ngff CLI starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let settings = Settings::load(cli.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Validate(args) => runtime.block_on(run_validate(&args, settings)),
        Commands::SchemaUrl(args) => run_schema_url(&args, &SchemaLocator::new(settings.locator)),
        Commands::Array(args) => runtime.block_on(run_array(&args, settings)),
    }
}
