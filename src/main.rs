//! # thermocurate CLI
//!
//! Command-line front end for the ThermoML activity-coefficient curation
//! pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Curate a raw measurement export
//! thermocurate -v curate export.parquet -f formulas.csv -o curated/
//!
//! # Inspect a written artifact
//! thermocurate info curated/parseddata.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::init_logging(args.verbosity());
    cli::dispatch(args)
}
