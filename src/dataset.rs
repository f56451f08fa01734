//! # Raw Dataset Loading
//!
//! Thin adapters over the external collaborators: the ThermoML measurement
//! export (Parquet or CSV, picked by extension) and the static
//! name-to-formula table (CSV with `name` and `formula` columns).
//!
//! Loading also pins down the measurement table's contract for the rest of
//! the pipeline: the structural columns must be present, at least one of the
//! tracked experiment columns must carry data, and any absent optional
//! columns (experiment values, their standard deviations, pressure) are
//! added as all-missing so later stages can read them by name without
//! re-checking.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use crate::frame::{Frame, FrameError, Value};
use crate::pipeline::columns;

/// Errors raised while loading raw inputs
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Underlying frame (CSV/Parquet) error
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Input path has an extension we cannot load
    #[error("Unsupported dataset format: '{0}' (expected .parquet or .csv)")]
    UnsupportedFormat(String),

    /// Measurement table is missing a structural column
    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    /// Measurement table carries none of the tracked experiment columns
    #[error("Dataset carries none of the tracked experiment columns")]
    NoExperimentColumns,

    /// Formula table is missing one of its two columns
    #[error("Formula table is missing column: {0}")]
    FormulaTableColumn(String),
}

/// Load the raw measurement table and normalize its column contract.
pub fn load_measurements<P: AsRef<Path>>(path: P) -> Result<Frame, DatasetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut frame = match extension.as_str() {
        "parquet" => Frame::read_parquet(path)?,
        "csv" => Frame::read_csv_file(path, b',')?,
        other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
    };

    for required in [
        columns::FILENAME,
        columns::COMPONENTS,
        columns::TEMPERATURE,
        columns::PHASE,
    ] {
        if !frame.has_column(required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }
    if !columns::EXPERIMENTS.iter().any(|e| frame.has_column(e)) {
        return Err(DatasetError::NoExperimentColumns);
    }

    // Optional columns the projection reads by name later. Absent ones are
    // added as all-missing here rather than discovered missing ten stages in.
    let n_rows = frame.n_rows();
    for optional in columns::OPTIONAL_MEASUREMENTS {
        if !frame.has_column(optional) {
            debug!("Dataset lacks '{optional}'; adding an all-missing column");
            frame.add_column(*optional, vec![Value::Null; n_rows])?;
        }
    }

    info!(
        "Loaded {} measurement rows ({} columns) from {}",
        frame.n_rows(),
        frame.n_cols(),
        path.display()
    );
    Ok(frame)
}

/// Load the static chemical-name-to-formula table. Rows with an empty name
/// or formula are skipped.
pub fn load_formula_table<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<String, String>, DatasetError> {
    let path = path.as_ref();
    let frame = Frame::read_csv_file(path, b',')?;

    for required in ["name", "formula"] {
        if !frame.has_column(required) {
            return Err(DatasetError::FormulaTableColumn(required.to_string()));
        }
    }

    let mut table = HashMap::new();
    for row in 0..frame.n_rows() {
        let name = frame.str_value("name", row);
        let formula = frame.str_value("formula", row);
        if let (Some(name), Some(formula)) = (name, formula) {
            table.insert(name.to_string(), formula.to_string());
        }
    }

    info!(
        "Loaded {} name-to-formula entries from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}
