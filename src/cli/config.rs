//! TOML configuration file support for repeat runs.
//!
//! Instead of passing many CLI flags, users can specify settings in a config
//! file:
//!
//! ```toml
//! # thermocurate.toml
//! [curation]
//! dataset = "thermoml_export.parquet"
//! formula_table = "compound_name_to_formula.csv"
//! output_dir = "curated"
//! cache_dir = ".thermocurate"
//! excluded_files = ["data/j.fluid.2013.12.014.xml"]
//! resolver_base_url = "https://cactus.nci.nih.gov/chemical/structure"
//! resolver_timeout_secs = 30
//! ```
//!
//! CLI flags override config-file values, which override built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for thermocurate.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Curation-run settings.
    #[serde(default)]
    pub curation: CurationConfig,
}

/// Configuration for the curate command.
#[derive(Debug, Default, Deserialize)]
pub struct CurationConfig {
    /// Path of the raw measurement table (.parquet or .csv).
    pub dataset: Option<PathBuf>,

    /// Path of the name-to-formula CSV table.
    pub formula_table: Option<PathBuf>,

    /// Directory the output tables are written into.
    pub output_dir: Option<PathBuf>,

    /// Directory holding the resolver cache.
    pub cache_dir: Option<PathBuf>,

    /// Source files excluded from curation (matched against the raw
    /// `filename` column before any normalization).
    #[serde(default)]
    pub excluded_files: Vec<String>,

    /// Base URL of the chemical identifier resolver.
    pub resolver_base_url: Option<String>,

    /// Per-request resolver timeout in seconds.
    pub resolver_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [curation]
            dataset = "export.parquet"
            formula_table = "formulas.csv"
            output_dir = "curated"
            cache_dir = ".thermocurate"
            excluded_files = ["a.xml", "b.xml"]
            resolver_base_url = "http://localhost:8080/structure"
            resolver_timeout_secs = 10
        "#;

        let config = Config::from_str(toml).unwrap();
        let curation = config.curation;
        assert_eq!(curation.dataset, Some(PathBuf::from("export.parquet")));
        assert_eq!(curation.excluded_files, vec!["a.xml", "b.xml"]);
        assert_eq!(
            curation.resolver_base_url.as_deref(),
            Some("http://localhost:8080/structure")
        );
        assert_eq!(curation.resolver_timeout_secs, Some(10));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [curation]
            dataset = "export.csv"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.curation.dataset, Some(PathBuf::from("export.csv")));
        assert!(config.curation.formula_table.is_none());
        assert!(config.curation.excluded_files.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert!(config.curation.dataset.is_none());
    }
}
