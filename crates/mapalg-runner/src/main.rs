//! `mapalg` command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mapalg_runner::{commands, RunnerConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "mapalg")]
#[command(author, version, about = "Map-algebra operations on GeoTIFF rasters", long_about = None)]
struct Cli {
    /// Configuration file (default: ./mapalg.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raster-algebra engine, overriding the configuration
    #[arg(short, long, global = true)]
    engine: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available operations
    List,
    /// Show an operation's metadata and parameters
    Describe {
        /// Operation id
        id: String,
    },
    /// Run an operation
    Run {
        /// Operation id
        id: String,
        /// Parameter as KEY=VALUE, e.g. -p INPUT=dem.tif
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Print outputs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the header of a raster file
    Info {
        /// Raster file
        input: PathBuf,
    },
}

fn setup_logging(config: &RunnerConfig, verbose: bool) {
    let directive = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = RunnerConfig::discover(cli.config.as_deref(), &cwd)?;
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    setup_logging(&config, cli.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::List => commands::list(&mut out),
        Commands::Describe { id } => commands::describe(&mut out, &id),
        Commands::Run { id, params, json } => commands::run(&mut out, &config, &id, &params, json),
        Commands::Info { input } => commands::info(&mut out, &input),
    }
}

fn main() {
    if let Err(e) = execute(Cli::parse()) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
