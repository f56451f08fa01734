//! The curate command: run the full pipeline and write all artifacts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use thermocurate::dataset;
use thermocurate::pipeline;
use thermocurate::resolver::{CachedResolver, CirClient, ResolverCache, DEFAULT_BASE_URL};

use super::config::Config;

/// Output file names, relative to the output directory.
const PARSED_CSV: &str = "parseddata.csv";
const PARSED_PARQUET: &str = "parseddata.parquet";
const ALL_CSV: &str = "alldata.csv";
const ALL_PARQUET: &str = "alldata.parquet";
const FILENAME_COUNTS_CSV: &str = "filename_counts.csv";
const COMPONENT_COUNTS_CSV: [&str; 2] = ["component_counts_0.csv", "component_counts_1.csv"];

/// Flag values for the curate command, before config-file merging.
pub struct CurateArgs {
    pub dataset: Option<PathBuf>,
    pub formula_table: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub resolver_url: Option<String>,
    pub resolver_timeout_secs: Option<u64>,
    pub config: Option<PathBuf>,
}

/// Fully merged settings: flags override config, config overrides defaults.
#[derive(Debug)]
struct Settings {
    dataset: PathBuf,
    formula_table: PathBuf,
    output_dir: PathBuf,
    cache_dir: PathBuf,
    excluded_files: Vec<String>,
    resolver_url: String,
    resolver_timeout: Duration,
}

impl Settings {
    fn merge(args: CurateArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let file = config.curation;

        let dataset = args
            .dataset
            .or(file.dataset)
            .context("No dataset path given (flag or [curation].dataset)")?;
        let formula_table = args
            .formula_table
            .or(file.formula_table)
            .context("No formula table path given (--formula-table or [curation].formula_table)")?;

        let mut excluded_files = file.excluded_files;
        excluded_files.extend(args.exclude);

        Ok(Self {
            dataset,
            formula_table,
            output_dir: args
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            cache_dir: args
                .cache_dir
                .or(file.cache_dir)
                .unwrap_or_else(|| PathBuf::from(".thermocurate")),
            excluded_files,
            resolver_url: args
                .resolver_url
                .or(file.resolver_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            resolver_timeout: Duration::from_secs(
                args.resolver_timeout_secs
                    .or(file.resolver_timeout_secs)
                    .unwrap_or(30),
            ),
        })
    }
}

/// Run the curation pipeline end to end.
pub fn run(args: CurateArgs) -> Result<()> {
    let settings = Settings::merge(args)?;

    if !settings.dataset.exists() {
        anyhow::bail!("Dataset does not exist: {}", settings.dataset.display());
    }

    info!("thermocurate - ThermoML activity data curation");
    info!("===============================================");
    info!("Dataset:       {}", settings.dataset.display());
    info!("Formula table: {}", settings.formula_table.display());
    info!("Output dir:    {}", settings.output_dir.display());
    info!("Cache dir:     {}", settings.cache_dir.display());
    info!("Resolver:      {}", settings.resolver_url);
    if !settings.excluded_files.is_empty() {
        info!("Excluded:      {} source file(s)", settings.excluded_files.len());
    }

    let frame = dataset::load_measurements(&settings.dataset)
        .context("Failed to load measurement table")?;
    let formulas = dataset::load_formula_table(&settings.formula_table)
        .context("Failed to load formula table")?;

    let cache = ResolverCache::open(&settings.cache_dir).context("Failed to open resolver cache")?;
    let client = CirClient::new(&settings.resolver_url, settings.resolver_timeout)
        .context("Failed to build resolver client")?;
    let mut resolver = CachedResolver::new(client, cache);

    let output = pipeline::run(frame, &formulas, &mut resolver, &settings.excluded_files)
        .context("Curation pipeline failed")?;
    let report = pipeline::build_report(&output.projected, &mut resolver)
        .context("Failed to build report tables")?;

    info!(
        "External resolver lookups this run: {}",
        resolver.external_calls()
    );
    resolver.close().context("Failed to persist resolver cache")?;

    // Everything is finalized; only now touch the output directory.
    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            settings.output_dir.display()
        )
    })?;
    let out = |name: &str| settings.output_dir.join(name);

    output.projected.write_csv_file(out(PARSED_CSV))?;
    output.projected.write_parquet(out(PARSED_PARQUET))?;
    output.all.write_csv_file(out(ALL_CSV))?;
    output.all.write_parquet(out(ALL_PARQUET))?;

    report.filename_counts.write_csv_file(out(FILENAME_COUNTS_CSV))?;
    report
        .component_0_counts
        .write_csv_file(out(COMPONENT_COUNTS_CSV[0]))?;
    report
        .component_1_counts
        .write_csv_file(out(COMPONENT_COUNTS_CSV[1]))?;

    info!(
        "Wrote {} curated rows ({} projected columns, {} total columns) to {}",
        output.projected.n_rows(),
        output.projected.n_cols(),
        output.all.n_cols(),
        settings.output_dir.display()
    );
    Ok(())
}
