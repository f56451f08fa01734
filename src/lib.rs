//! # thermocurate - ThermoML Activity Data Curation
//!
//! `thermocurate` filters and enriches a raw ThermoML activity-coefficient
//! export into a curated table for downstream scientific use. The pipeline
//! is a single sequential pass: load the raw measurement table, apply
//! structural and physical filters, enrich each surviving mixture with
//! resolver-derived chemical identifiers, and persist the results as
//! semicolon-delimited CSV plus Parquet snapshots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thermocurate::{dataset, pipeline};
//! use thermocurate::resolver::{CachedResolver, CirClient, ResolverCache};
//!
//! # fn main() -> anyhow::Result<()> {
//! let frame = dataset::load_measurements("export.parquet")?;
//! let formulas = dataset::load_formula_table("formulas.csv")?;
//!
//! // The resolver cache is opened explicitly and persisted on close.
//! let cache = ResolverCache::open(".thermocurate")?;
//! let mut resolver = CachedResolver::new(CirClient::public()?, cache);
//!
//! let output = pipeline::run(frame, &formulas, &mut resolver, &[])?;
//! let report = pipeline::build_report(&output.projected, &mut resolver)?;
//! resolver.close()?;
//!
//! output.projected.write_csv_file("parseddata.csv")?;
//! output.projected.write_parquet("parseddata.parquet")?;
//! output.all.write_csv_file("alldata.csv")?;
//! output.all.write_parquet("alldata.parquet")?;
//! report.filename_counts.write_csv_file("filename_counts.csv")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Curation chain
//!
//! Rows only ever leave the table: block-listed source files, mixtures
//! without one of the tracked activity experiments, mixtures with other
//! than two components, components without a formula entry, compositions
//! outside the H/C/O/N/P/S/Cl/F element set, unresolvable identifiers,
//! non-liquid or out-of-range temperatures, and components with more than
//! 30 heavy atoms are all dropped in a fixed order. Cheap structural
//! filters run first so the expensive (cached) resolver lookups see as few
//! rows as possible.
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`frame`]: minimal column-oriented table with CSV/Parquet I/O
//! - [`formula`]: chemical formula parsing and atom counting
//! - [`resolver`]: cached chemical identifier resolution
//! - [`dataset`]: raw measurement and formula-table loaders
//! - [`pipeline`]: the ordered filter/enrich chain and report tables

pub mod dataset;
pub mod formula;
pub mod frame;
pub mod pipeline;
pub mod resolver;
