//! # Column-Oriented Measurement Table
//!
//! A minimal, dynamically-typed table used by the curation pipeline. Every
//! stage of the pipeline is a `Frame -> Frame` function, so the type only
//! carries what those stages need: named columns of equal length, row
//! filtering, projection, all-null-column housekeeping, and frequency counts.
//!
//! Cells are [`Value`]s: either missing, text, or a 64-bit float. The raw
//! ThermoML export mixes identifiers, labels, and measured quantities in one
//! table, so a per-cell dynamic type mirrors the data more honestly than a
//! fixed row struct would.
//!
//! Serialization lives in [`io`]: semicolon-delimited CSV plus a Parquet
//! snapshot (ZSTD-compressed) as the binary counterpart.

use std::fmt;

mod io;

pub use io::CSV_DELIMITER;

/// Errors that can occur during frame operations
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A stage or projection asked for a column the frame does not carry
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// A column being added does not match the frame's row count
    #[error("Column length mismatch for '{name}': expected {expected}, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Error from the CSV reader/writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the Arrow library
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A Parquet snapshot carries a column type the frame cannot represent
    #[error("Unsupported column type for '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },
}

/// A single cell: missing, text, or numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Num(f64),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text content, if this cell holds text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric content, if this cell holds a number.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell at `row`; `None` when the row is out of range.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// True when every cell is missing (the column carries no information).
    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(Value::is_null)
    }

    /// True when the column holds numbers (and possibly nulls) only;
    /// such a column serializes as Float64 in Parquet snapshots.
    pub(crate) fn is_numeric(&self) -> bool {
        let mut saw_num = false;
        for v in &self.values {
            match v {
                Value::Num(_) => saw_num = true,
                Value::Str(_) => return false,
                Value::Null => {}
            }
        }
        saw_num
    }
}

/// An ordered collection of equal-length named columns.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (zero for an empty frame).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column a stage depends on, failing with the column name.
    /// Stages call this for every input column before touching rows, which
    /// keeps each stage's input contract explicit.
    pub fn require(&self, name: &str) -> Result<&Column, FrameError> {
        self.column(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    /// Cell at (column, row); `None` when the column does not exist or the
    /// row is out of range.
    pub fn value(&self, name: &str, row: usize) -> Option<&Value> {
        self.column(name).and_then(|c| c.get(row))
    }

    /// Text cell at (column, row); `None` for missing columns or non-text cells.
    pub fn str_value(&self, name: &str, row: usize) -> Option<&str> {
        self.value(name, row).and_then(Value::as_str)
    }

    /// Numeric cell at (column, row); `None` for missing columns or non-numeric cells.
    pub fn num_value(&self, name: &str, row: usize) -> Option<f64> {
        self.value(name, row).and_then(Value::as_num)
    }

    /// Add a column, replacing any existing column of the same name.
    /// The length must match the frame's row count unless the frame is empty.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), FrameError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(FrameError::LengthMismatch {
                name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == name) {
            existing.values = values;
        } else {
            self.columns.push(Column::new(name, values));
        }
        Ok(())
    }

    /// Keep only the rows flagged `true`. The mask length must equal the
    /// row count.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.n_rows());
        for column in &mut self.columns {
            let mut it = keep.iter();
            column.values.retain(|_| *it.next().unwrap_or(&false));
        }
    }

    /// Keep only the rows for which the predicate holds.
    pub fn retain_where<F>(&mut self, pred: F)
    where
        F: Fn(&Self, usize) -> bool,
    {
        let keep: Vec<bool> = (0..self.n_rows()).map(|row| pred(self, row)).collect();
        self.retain_rows(&keep);
    }

    /// Drop columns whose every cell is missing, except those named in
    /// `keep`. Columns read later by name must be listed in `keep` so this
    /// housekeeping can never break a downstream stage's contract. A frame
    /// with zero rows is left untouched: every column is vacuously all-null
    /// there, and dropping them would erase the schema.
    pub fn drop_null_columns(&mut self, keep: &[&str]) {
        if self.n_rows() == 0 {
            return;
        }
        self.columns
            .retain(|c| keep.contains(&c.name.as_str()) || !c.is_all_null());
    }

    /// Project the frame onto the named columns, in the given order.
    /// Every name must exist.
    pub fn select(&self, names: &[&str]) -> Result<Frame, FrameError> {
        let mut columns = Vec::with_capacity(names.len());
        for &name in names {
            columns.push(self.require(name)?.clone());
        }
        Ok(Frame { columns })
    }

    /// Frequency table of the text values in a column, as a two-column frame
    /// `[key_name, "Count"]`. Missing cells are not counted. Rows are ordered
    /// by descending count, ties broken by ascending value, so the result is
    /// deterministic across runs.
    pub fn value_counts(&self, name: &str, key_name: &str) -> Result<Frame, FrameError> {
        let column = self.require(name)?;
        let mut counts: Vec<(String, u64)> = Vec::new();
        for value in column.values() {
            if let Some(s) = value.as_str() {
                match counts.iter_mut().find(|(k, _)| k == s) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((s.to_string(), 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let (keys, ns): (Vec<Value>, Vec<Value>) = counts
            .into_iter()
            .map(|(k, n)| (Value::Str(k), Value::Num(n as f64)))
            .unzip();

        let mut out = Frame::new();
        out.add_column(key_name, keys)?;
        out.add_column("Count", ns)?;
        Ok(out)
    }
}
