//! Reporting aggregates derived from the projected table.
//!
//! Small lookup tables for human inspection: how many curated rows each
//! source file contributed, and how often each component (by InChI key)
//! occurs, annotated with its resolved IUPAC name and SMILES. These side
//! tables are written next to the primary outputs but never merged back
//! into them. Unlike the pipeline proper, a failed resolution here leaves a
//! missing cell instead of dropping the row.

use log::info;

use crate::frame::{Frame, Value};
use crate::resolver::{IdentifierKind, Resolve};

use super::columns;
use super::PipelineError;

/// Frequency/lookup tables derived from one curated projection.
#[derive(Debug)]
pub struct CurationReport {
    /// Rows contributed per source file: `Filename`, `Count`
    pub filename_counts: Frame,
    /// Occurrences of each first component: `InChI`, `Count`, `Component`, `SMILES`
    pub component_0_counts: Frame,
    /// Occurrences of each second component: same shape
    pub component_1_counts: Frame,
}

/// Build the report tables from the projected frame.
pub fn build_report<R: Resolve>(
    projected: &Frame,
    resolver: &mut R,
) -> Result<CurationReport, PipelineError> {
    let filename_counts = projected.value_counts(columns::FILENAME, "Filename")?;
    let component_0_counts = component_counts(projected, columns::INCHI_0, resolver)?;
    let component_1_counts = component_counts(projected, columns::INCHI_1, resolver)?;

    info!(
        "Report: {} source files, {} / {} distinct components",
        filename_counts.n_rows(),
        component_0_counts.n_rows(),
        component_1_counts.n_rows()
    );

    Ok(CurationReport {
        filename_counts,
        component_0_counts,
        component_1_counts,
    })
}

fn component_counts<R: Resolve>(
    projected: &Frame,
    inchi_column: &str,
    resolver: &mut R,
) -> Result<Frame, PipelineError> {
    let mut counts = projected.value_counts(inchi_column, "InChI")?;

    let mut names = Vec::with_capacity(counts.n_rows());
    let mut smiles = Vec::with_capacity(counts.n_rows());
    for row in 0..counts.n_rows() {
        match counts.str_value("InChI", row) {
            Some(key) => {
                names.push(resolve_first(resolver, key, IdentifierKind::IupacName)?);
                smiles.push(resolve_first(resolver, key, IdentifierKind::Smiles)?);
            }
            None => {
                names.push(Value::Null);
                smiles.push(Value::Null);
            }
        }
    }
    counts.add_column("Component", names)?;
    counts.add_column("SMILES", smiles)?;
    Ok(counts)
}

fn resolve_first<R: Resolve>(
    resolver: &mut R,
    input: &str,
    kind: IdentifierKind,
) -> Result<Value, PipelineError> {
    Ok(resolver
        .resolve(input, kind)?
        .map(|r| r.first().to_string())
        .into())
}
