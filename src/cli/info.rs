//! Inspect a written curation artifact.

use anyhow::{Context, Result};
use std::path::PathBuf;

use thermocurate::frame::{Frame, Value};
use thermocurate::pipeline::columns;

/// Print shape and per-column statistics for a Parquet artifact, and report
/// whether it carries the full curated projection.
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let frame = Frame::read_parquet(&file)
        .with_context(|| format!("Failed to read Parquet artifact: {}", file.display()))?;

    println!("{}", file.display());
    println!("  {} rows, {} columns", frame.n_rows(), frame.n_cols());
    println!();

    for column in frame.columns() {
        let missing = column.values().iter().filter(|v| v.is_null()).count();
        let kind = column
            .values()
            .iter()
            .find(|v| !v.is_null())
            .map_or("empty", |v| match v {
                Value::Num(_) => "numeric",
                _ => "text",
            });
        println!("  {:<28} {:>7}  {} missing", column.name(), kind, missing);
    }

    let absent: Vec<&str> = columns::PROJECTED
        .iter()
        .copied()
        .filter(|name| !frame.has_column(name))
        .collect();
    println!();
    if absent.is_empty() {
        println!(
            "  Carries the full curated projection ({} columns).",
            columns::PROJECTED.len()
        );
    } else {
        println!("  Not a curated projection; missing: {}", absent.join(", "));
    }

    Ok(())
}
