//! # Curation Pipeline
//!
//! The ordered filter/enrich chain that turns the raw ThermoML activity
//! measurement table into the curated output tables. Every stage is a pure
//! `Frame -> Frame` function; rows only ever leave the table, never return,
//! and the cheap structural filters run before the stages that call out to
//! the identifier resolver so external lookups stay at a minimum.
//!
//! Stage order:
//! 1. drop block-listed source files;
//! 2. keep rows reporting at least one tracked experiment;
//! 3. keep two-component mixtures and split the composite name;
//! 4. join molecular formulas from the static name table;
//! 5. count atoms and keep mixtures inside the allowed element set;
//! 6. resolve SMILES, CAS, and InChI keys per component;
//! 7. keep liquid-phase rows in the (250, 400) K range;
//! 8. normalize source filenames to their stem;
//! 9. keep components with 1 to 30 heavy atoms;
//! 10. project the fifteen-column output table.
//!
//! [`report`] derives the frequency/lookup side tables from the projection.

use crate::frame::{Frame, FrameError};
use crate::resolver::{Resolve, ResolverError};

pub mod columns;
pub mod report;
mod stages;

pub use report::{build_report, CurationReport};

/// Separator joining the two component names in the composite field.
pub const COMPONENT_SEPARATOR: &str = "__";

/// Phase label of rows that survive the physical filter.
pub const LIQUID_PHASE: &str = "Liquid";

/// Exclusive temperature bounds in kelvin.
pub const TEMPERATURE_MIN_K: f64 = 250.0;
pub const TEMPERATURE_MAX_K: f64 = 400.0;

/// Inclusive upper bound on per-component heavy atoms.
pub const MAX_HEAVY_ATOMS: u32 = 30;

/// Errors that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A stage's input contract was violated or table I/O failed
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// The resolver layer failed (cache I/O, not lookup misses)
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),
}

/// The two tables a pipeline run produces.
#[derive(Debug)]
pub struct CurationOutput {
    /// Full filtered table with every surviving column
    pub all: Frame,
    /// Fifteen-column projection for downstream use
    pub projected: Frame,
}

/// Run the full curation chain over a loaded measurement table.
pub fn run<R: Resolve>(
    frame: Frame,
    formulas: &std::collections::HashMap<String, String>,
    resolver: &mut R,
    excluded_files: &[String],
) -> Result<CurationOutput, PipelineError> {
    let frame = stages::exclude_sources(frame, excluded_files)?;
    let frame = stages::filter_experiments(frame)?;
    let frame = stages::split_components(frame)?;
    let frame = stages::join_formulas(frame, formulas)?;
    let frame = stages::filter_elements(frame)?;
    let frame = stages::enrich_identifiers(frame, resolver)?;
    let frame = stages::filter_physical(frame)?;
    let frame = stages::normalize_filenames(frame)?;
    let frame = stages::filter_size(frame)?;
    let projected = stages::project(&frame)?;
    Ok(CurationOutput {
        all: frame,
        projected,
    })
}
