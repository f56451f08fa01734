use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod curate;
mod info;

use curate::CurateArgs;

/// thermocurate - ThermoML Activity-Coefficient Curation Pipeline
#[derive(Parser)]
#[command(name = "thermocurate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and enrich a raw measurement table into curated outputs
    Curate {
        /// Raw measurement table (.parquet or .csv)
        #[arg(value_name = "DATASET")]
        dataset: Option<PathBuf>,

        /// Chemical name-to-formula CSV table
        #[arg(short = 'f', long, value_name = "FILE")]
        formula_table: Option<PathBuf>,

        /// Directory the output tables are written into (default: .)
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Directory holding the resolver cache (default: .thermocurate)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Source file to exclude from curation (repeatable)
        #[arg(long = "exclude", value_name = "FILENAME")]
        exclude: Vec<String>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Base URL of the chemical identifier resolver
        #[arg(long, value_name = "URL")]
        resolver_url: Option<String>,

        /// Per-request resolver timeout in seconds (default: 30)
        #[arg(long, value_name = "SECS")]
        resolver_timeout: Option<u64>,
    },

    /// Display information about a written Parquet artifact
    Info {
        /// Artifact path (e.g. parseddata.parquet)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Curate {
            dataset,
            formula_table,
            output_dir,
            cache_dir,
            exclude,
            config,
            resolver_url,
            resolver_timeout,
        } => curate::run(CurateArgs {
            dataset,
            formula_table,
            output_dir,
            cache_dir,
            exclude,
            resolver_url,
            resolver_timeout_secs: resolver_timeout,
            config,
        }),
        Commands::Info { file } => info::run(file),
    }
}
