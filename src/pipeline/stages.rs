//! The individual pipeline stages, in execution order.
//!
//! Every stage validates its required input columns with
//! [`Frame::require`] before touching rows, so a violated contract fails
//! with the offending column's name instead of silently producing an empty
//! table. All-null-column housekeeping always protects the retained column
//! set, which keeps every later stage's inputs and the final projection
//! safe from earlier cleanup.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::formula::{count_atoms, count_atoms_in_set, DESIRED_ELEMENTS, HEAVY_ELEMENTS};
use crate::frame::{Frame, Value};
use crate::resolver::{IdentifierKind, Resolve};

use super::columns::{self, PROJECTED, RETAINED};
use super::{
    PipelineError, COMPONENT_SEPARATOR, LIQUID_PHASE, MAX_HEAVY_ATOMS, TEMPERATURE_MAX_K,
    TEMPERATURE_MIN_K,
};

/// Drop measurements that originate from block-listed source files.
pub fn exclude_sources(mut frame: Frame, excluded: &[String]) -> Result<Frame, PipelineError> {
    frame.require(columns::FILENAME)?;
    let before = frame.n_rows();
    frame.retain_where(|f, row| {
        f.str_value(columns::FILENAME, row)
            .map_or(true, |name| !excluded.iter().any(|b| b == name))
    });
    info!("Source exclusion: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Keep rows reporting at least one of the tracked experiments.
pub fn filter_experiments(mut frame: Frame) -> Result<Frame, PipelineError> {
    for experiment in columns::EXPERIMENTS {
        frame.require(experiment)?;
    }
    let before = frame.n_rows();
    frame.retain_where(|f, row| {
        columns::EXPERIMENTS
            .iter()
            .any(|e| f.value(e, row).map_or(false, |v| !v.is_null()))
    });
    info!("Experiment filter: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Keep two-component mixtures and split the composite name into
/// `component_0` / `component_1`.
pub fn split_components(mut frame: Frame) -> Result<Frame, PipelineError> {
    frame.require(columns::COMPONENTS)?;
    let before = frame.n_rows();
    frame.retain_where(|f, row| {
        f.str_value(columns::COMPONENTS, row)
            .map_or(false, |s| s.split(COMPONENT_SEPARATOR).count() == 2)
    });

    let mut first = Vec::with_capacity(frame.n_rows());
    let mut second = Vec::with_capacity(frame.n_rows());
    for row in 0..frame.n_rows() {
        let composite = frame
            .str_value(columns::COMPONENTS, row)
            .unwrap_or_default();
        let mut parts = composite.split(COMPONENT_SEPARATOR);
        first.push(Value::from(parts.next().unwrap_or_default()));
        second.push(Value::from(parts.next().unwrap_or_default()));
    }
    frame.add_column(columns::COMPONENT_0, first)?;
    frame.add_column(columns::COMPONENT_1, second)?;
    frame.drop_null_columns(RETAINED);

    info!("Arity filter: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Join molecular formulas from the static name table; rows whose component
/// has no entry are dropped, never defaulted.
pub fn join_formulas(
    mut frame: Frame,
    formulas: &HashMap<String, String>,
) -> Result<Frame, PipelineError> {
    frame.require(columns::COMPONENT_0)?;
    frame.require(columns::COMPONENT_1)?;
    let before = frame.n_rows();

    frame.retain_where(|f, row| {
        [columns::COMPONENT_0, columns::COMPONENT_1].iter().all(|c| {
            match f.str_value(c, row) {
                Some(name) if formulas.contains_key(name) => true,
                Some(name) => {
                    debug!("No formula entry for component '{name}'");
                    false
                }
                None => false,
            }
        })
    });

    for (component, formula_col) in [
        (columns::COMPONENT_0, columns::FORMULA_0),
        (columns::COMPONENT_1, columns::FORMULA_1),
    ] {
        let values: Vec<Value> = (0..frame.n_rows())
            .map(|row| {
                frame
                    .str_value(component, row)
                    .and_then(|name| formulas.get(name).cloned())
                    .into()
            })
            .collect();
        frame.add_column(formula_col, values)?;
    }

    info!("Formula join: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Per-component atom counts derived from one formula string.
struct AtomCounts {
    total: u32,
    heavy: u32,
    desired: u32,
}

fn atom_counts(formula: &str) -> Result<AtomCounts, crate::formula::FormulaError> {
    Ok(AtomCounts {
        total: count_atoms(formula)?,
        heavy: count_atoms_in_set(formula, HEAVY_ELEMENTS)?,
        desired: count_atoms_in_set(formula, DESIRED_ELEMENTS)?,
    })
}

/// Add atom-count columns for both components and keep only mixtures whose
/// atoms all fall inside the allowed element set. Rows with a malformed
/// formula are logged at warn level and dropped.
pub fn filter_elements(mut frame: Frame) -> Result<Frame, PipelineError> {
    frame.require(columns::FORMULA_0)?;
    frame.require(columns::FORMULA_1)?;
    let before = frame.n_rows();

    let mut keep = vec![false; frame.n_rows()];
    let mut derived: Vec<[AtomCounts; 2]> = Vec::new();
    for row in 0..frame.n_rows() {
        let (Some(f0), Some(f1)) = (
            frame.str_value(columns::FORMULA_0, row),
            frame.str_value(columns::FORMULA_1, row),
        ) else {
            continue;
        };
        match (atom_counts(f0), atom_counts(f1)) {
            (Ok(c0), Ok(c1)) => {
                keep[row] = true;
                derived.push([c0, c1]);
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Dropping row with unparseable formula: {e}");
            }
        }
    }
    frame.retain_rows(&keep);

    for (i, total_col, heavy_col, desired_col, other_col) in [
        (
            0,
            columns::N_ATOMS_0,
            columns::N_HEAVY_ATOMS_0,
            columns::N_DESIRED_ATOMS_0,
            columns::N_OTHER_ATOMS_0,
        ),
        (
            1,
            columns::N_ATOMS_1,
            columns::N_HEAVY_ATOMS_1,
            columns::N_DESIRED_ATOMS_1,
            columns::N_OTHER_ATOMS_1,
        ),
    ] {
        let num = |f: fn(&AtomCounts) -> u32| -> Vec<Value> {
            derived
                .iter()
                .map(|pair| Value::Num(f(&pair[i]) as f64))
                .collect()
        };
        frame.add_column(total_col, num(|c| c.total))?;
        frame.add_column(heavy_col, num(|c| c.heavy))?;
        frame.add_column(desired_col, num(|c| c.desired))?;
        frame.add_column(other_col, num(|c| c.total - c.desired))?;
    }

    frame.retain_where(|f, row| {
        f.num_value(columns::N_OTHER_ATOMS_0, row) == Some(0.0)
            && f.num_value(columns::N_OTHER_ATOMS_1, row) == Some(0.0)
    });
    frame.drop_null_columns(RETAINED);

    info!("Element filter: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Resolve SMILES, CAS, and standard InChI key for both components. Rows
/// where any identifier cannot be resolved are dropped right after the
/// column that exposed the failure, keeping later lookups cheap.
pub fn enrich_identifiers<R: Resolve>(
    mut frame: Frame,
    resolver: &mut R,
) -> Result<Frame, PipelineError> {
    frame.require(columns::COMPONENT_0)?;
    frame.require(columns::COMPONENT_1)?;
    let before = frame.n_rows();

    let component_cols = [
        (columns::COMPONENT_0, columns::SMILES_0, columns::CAS_0, columns::INCHI_0),
        (columns::COMPONENT_1, columns::SMILES_1, columns::CAS_1, columns::INCHI_1),
    ];

    for (component, smiles_col, _, _) in component_cols {
        let values = resolve_column(&frame, component, IdentifierKind::Smiles, resolver)?;
        frame.add_column(smiles_col, values)?;
        drop_missing(&mut frame, smiles_col);
    }

    for (component, _, cas_col, inchi_col) in component_cols {
        let cas = resolve_column(&frame, component, IdentifierKind::Cas, resolver)?;
        frame.add_column(cas_col, cas)?;
        let inchi = resolve_column(&frame, component, IdentifierKind::StdInchiKey, resolver)?;
        frame.add_column(inchi_col, inchi)?;
        drop_missing(&mut frame, cas_col);
        drop_missing(&mut frame, inchi_col);
    }

    info!(
        "Identifier enrichment: {} -> {} rows",
        before,
        frame.n_rows()
    );
    Ok(frame)
}

fn resolve_column<R: Resolve>(
    frame: &Frame,
    component: &str,
    kind: IdentifierKind,
    resolver: &mut R,
) -> Result<Vec<Value>, PipelineError> {
    let mut values = Vec::with_capacity(frame.n_rows());
    for row in 0..frame.n_rows() {
        let resolved = match frame.str_value(component, row) {
            Some(name) => resolver
                .resolve(name, kind)?
                .map(|r| r.first().to_string()),
            None => None,
        };
        values.push(Value::from(resolved));
    }
    Ok(values)
}

fn drop_missing(frame: &mut Frame, column: &str) {
    let before = frame.n_rows();
    frame.retain_where(|f, row| f.value(column, row).map_or(false, |v| !v.is_null()));
    if frame.n_rows() < before {
        debug!(
            "Dropped {} rows with unresolved {column}",
            before - frame.n_rows()
        );
    }
}

/// Keep liquid-phase rows with temperature strictly inside (250, 400) K.
pub fn filter_physical(mut frame: Frame) -> Result<Frame, PipelineError> {
    frame.require(columns::TEMPERATURE)?;
    frame.require(columns::PHASE)?;
    let before = frame.n_rows();
    frame.retain_where(|f, row| {
        let in_range = f
            .num_value(columns::TEMPERATURE, row)
            .map_or(false, |t| t > TEMPERATURE_MIN_K && t < TEMPERATURE_MAX_K);
        in_range && f.str_value(columns::PHASE, row) == Some(LIQUID_PHASE)
    });
    info!("Physical filter: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Reduce source filenames to their stem: directory prefix and a trailing
/// `.xml` extension are stripped.
pub fn normalize_filenames(mut frame: Frame) -> Result<Frame, PipelineError> {
    let values: Vec<Value> = frame
        .require(columns::FILENAME)?
        .values()
        .iter()
        .map(|v| match v {
            Value::Str(path) => Value::Str(source_stem(path).to_string()),
            other => other.clone(),
        })
        .collect();
    frame.add_column(columns::FILENAME, values)?;
    Ok(frame)
}

fn source_stem(path: &str) -> &str {
    let name = path
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(path);
    name.strip_suffix(".xml").unwrap_or(name)
}

/// Keep rows where both components have 1 to 30 heavy atoms.
pub fn filter_size(mut frame: Frame) -> Result<Frame, PipelineError> {
    frame.require(columns::N_HEAVY_ATOMS_0)?;
    frame.require(columns::N_HEAVY_ATOMS_1)?;
    let before = frame.n_rows();
    let max = MAX_HEAVY_ATOMS as f64;
    frame.retain_where(|f, row| {
        [columns::N_HEAVY_ATOMS_0, columns::N_HEAVY_ATOMS_1]
            .iter()
            .all(|c| f.num_value(c, row).map_or(false, |n| n > 0.0 && n <= max))
    });
    frame.drop_null_columns(RETAINED);
    info!("Size filter: {} -> {} rows", before, frame.n_rows());
    Ok(frame)
}

/// Project the fifteen-column output table.
pub fn project(frame: &Frame) -> Result<Frame, PipelineError> {
    Ok(frame.select(PROJECTED)?)
}

#[cfg(test)]
mod unit_tests {
    use super::source_stem;

    #[test]
    fn test_source_stem() {
        assert_eq!(
            source_stem("/home/user/.thermoml/j.fluid.2013.12.014.xml"),
            "j.fluid.2013.12.014"
        );
        assert_eq!(source_stem("plain.xml"), "plain");
        assert_eq!(source_stem("already-a-stem"), "already-a-stem");
        assert_eq!(source_stem("dir\\windows.xml"), "windows");
    }
}
