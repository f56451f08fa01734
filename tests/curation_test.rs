//! End-to-end curation run through real files: raw CSV export in, curated
//! CSV/Parquet artifacts out, with the resolver cache persisted between runs.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use thermocurate::dataset;
use thermocurate::frame::Frame;
use thermocurate::pipeline::{self, columns};
use thermocurate::resolver::{
    CachedResolver, IdentifierKind, Resolution, Resolve, ResolverCache, ResolverError,
};

/// Offline stand-in for the external identifier service.
struct StubResolver {
    answers: HashMap<(String, IdentifierKind), Resolution>,
}

impl StubResolver {
    fn new() -> Self {
        let mut answers = HashMap::new();
        let mut add = |input: &str, kind, candidates: &[&str]| {
            let candidates = candidates.iter().map(|s| s.to_string()).collect();
            answers.insert(
                (input.to_string(), kind),
                Resolution::new(candidates).expect("non-empty candidates"),
            );
        };

        add("water", IdentifierKind::Smiles, &["O"]);
        add("water", IdentifierKind::Cas, &["7732-18-5", "558440-22-5"]);
        add(
            "water",
            IdentifierKind::StdInchiKey,
            &["XLYOFNOQVPJJNP-UHFFFAOYSA-N"],
        );
        add("ethanol", IdentifierKind::Smiles, &["CCO"]);
        add("ethanol", IdentifierKind::Cas, &["64-17-5"]);
        add(
            "ethanol",
            IdentifierKind::StdInchiKey,
            &["LFQSCWFLJHTTHZ-UHFFFAOYSA-N"],
        );

        // Report annotations keyed by InChI.
        add(
            "XLYOFNOQVPJJNP-UHFFFAOYSA-N",
            IdentifierKind::IupacName,
            &["oxidane"],
        );
        add("XLYOFNOQVPJJNP-UHFFFAOYSA-N", IdentifierKind::Smiles, &["O"]);
        add(
            "LFQSCWFLJHTTHZ-UHFFFAOYSA-N",
            IdentifierKind::IupacName,
            &["ethanol"],
        );
        add(
            "LFQSCWFLJHTTHZ-UHFFFAOYSA-N",
            IdentifierKind::Smiles,
            &["CCO"],
        );

        Self { answers }
    }
}

impl Resolve for StubResolver {
    fn resolve(
        &mut self,
        input: &str,
        kind: IdentifierKind,
    ) -> Result<Option<Resolution>, ResolverError> {
        Ok(self.answers.get(&(input.to_string(), kind)).cloned())
    }
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// Raw export with one row per filter so the chain is exercised end to end.
/// Only the first row survives.
const RAW_EXPORT: &str = "\
filename,components,\"Temperature, K\",\"Pressure, kPa\",phase,Activity coefficient,Density\n\
thermoml/j.fluid.2016.03.001.xml,water__ethanol,298.15,101.325,Liquid,0.804,\n\
thermoml/j.fluid.2016.03.001.xml,water__ethanol,450.0,101.325,Liquid,0.9,\n\
thermoml/j.fluid.2016.03.001.xml,water__ethanol,298.15,101.325,Gas,0.7,\n\
thermoml/j.fluid.2016.03.001.xml,water,298.15,101.325,Liquid,0.5,\n\
thermoml/j.fluid.2016.03.001.xml,water__salol,298.15,101.325,Liquid,0.6,\n\
thermoml/j.fluid.2016.03.001.xml,water__ethanol,298.15,101.325,Liquid,,\n\
thermoml/blocked.xml,water__ethanol,298.15,101.325,Liquid,0.7,\n\
";

const FORMULA_TABLE: &str = "\
name,formula\n\
water,H2O\n\
ethanol,C2H6O\n\
salol,C13H10O3\n\
";

fn run_once(work: &Path, cache_dir: &Path) -> (pipeline::CurationOutput, usize) {
    let frame = dataset::load_measurements(work.join("export.csv")).unwrap();
    let formulas = dataset::load_formula_table(work.join("formulas.csv")).unwrap();

    let cache = ResolverCache::open(cache_dir).unwrap();
    let mut resolver = CachedResolver::new(StubResolver::new(), cache);

    let excluded = vec!["thermoml/blocked.xml".to_string()];
    let output = pipeline::run(frame, &formulas, &mut resolver, &excluded).unwrap();
    let report = pipeline::build_report(&output.projected, &mut resolver).unwrap();

    output
        .projected
        .write_csv_file(work.join("parseddata.csv"))
        .unwrap();
    output
        .projected
        .write_parquet(work.join("parseddata.parquet"))
        .unwrap();
    output.all.write_csv_file(work.join("alldata.csv")).unwrap();
    report
        .filename_counts
        .write_csv_file(work.join("filename_counts.csv"))
        .unwrap();
    report
        .component_0_counts
        .write_csv_file(work.join("component_counts_0.csv"))
        .unwrap();

    let external_calls = resolver.external_calls();
    resolver.close().unwrap();
    (output, external_calls)
}

#[test]
fn test_curation_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path();
    write_file(work, "export.csv", RAW_EXPORT);
    write_file(work, "formulas.csv", FORMULA_TABLE);
    let cache_dir = work.join("cache");

    let (output, _) = run_once(work, &cache_dir);

    // One row survives the whole chain.
    assert_eq!(output.projected.n_rows(), 1);
    let names: Vec<&str> = output.projected.column_names().collect();
    assert_eq!(names, columns::PROJECTED);

    // Source path is normalized to its stem.
    assert_eq!(
        output.projected.str_value(columns::FILENAME, 0),
        Some("j.fluid.2016.03.001")
    );
    assert_eq!(
        output.projected.str_value(columns::COMPONENT_0, 0),
        Some("water")
    );
    assert_eq!(
        output.projected.str_value(columns::COMPONENT_1, 0),
        Some("ethanol")
    );
    assert_eq!(output.projected.str_value(columns::SMILES_0, 0), Some("O"));
    assert_eq!(
        output.projected.str_value(columns::SMILES_1, 0),
        Some("CCO")
    );
    // First candidate wins when the service returns several.
    assert_eq!(
        output.projected.str_value(columns::CAS_0, 0),
        Some("7732-18-5")
    );
    assert_eq!(
        output.projected.num_value(columns::TEMPERATURE, 0),
        Some(298.15)
    );
    assert_eq!(
        output.projected.num_value(columns::ACTIVITY_COEFFICIENT, 0),
        Some(0.804)
    );

    // The full table keeps the derived atom-count columns.
    assert!(output.all.has_column(columns::N_HEAVY_ATOMS_0));
    assert_eq!(output.all.num_value(columns::N_HEAVY_ATOMS_0, 0), Some(1.0));
    assert_eq!(output.all.num_value(columns::N_HEAVY_ATOMS_1, 0), Some(3.0));
    assert_eq!(output.all.num_value(columns::N_ATOMS_1, 0), Some(9.0));

    // Parquet snapshot round-trips the projection.
    let reloaded = Frame::read_parquet(work.join("parseddata.parquet")).unwrap();
    assert_eq!(reloaded.n_rows(), 1);
    assert_eq!(
        reloaded.str_value(columns::INCHI_0, 0),
        Some("XLYOFNOQVPJJNP-UHFFFAOYSA-N")
    );
    assert_eq!(reloaded.num_value(columns::TEMPERATURE, 0), Some(298.15));
}

#[test]
fn test_second_run_uses_cache_and_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path();
    write_file(work, "export.csv", RAW_EXPORT);
    write_file(work, "formulas.csv", FORMULA_TABLE);
    let cache_dir = work.join("cache");

    let (_, first_calls) = run_once(work, &cache_dir);
    assert!(first_calls > 0);
    let first_parsed = std::fs::read(work.join("parseddata.csv")).unwrap();
    let first_counts = std::fs::read(work.join("component_counts_0.csv")).unwrap();

    // Warmed cache: the second run never reaches the external service and
    // produces byte-identical artifacts.
    let (_, second_calls) = run_once(work, &cache_dir);
    assert_eq!(second_calls, 0);
    assert_eq!(std::fs::read(work.join("parseddata.csv")).unwrap(), first_parsed);
    assert_eq!(
        std::fs::read(work.join("component_counts_0.csv")).unwrap(),
        first_counts
    );
}

#[test]
fn test_report_annotates_components() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path();
    write_file(work, "export.csv", RAW_EXPORT);
    write_file(work, "formulas.csv", FORMULA_TABLE);

    run_once(work, &work.join("cache"));

    let counts = Frame::read_csv_file(work.join("component_counts_0.csv"), b';').unwrap();
    assert_eq!(counts.n_rows(), 1);
    assert_eq!(
        counts.str_value("InChI", 0),
        Some("XLYOFNOQVPJJNP-UHFFFAOYSA-N")
    );
    assert_eq!(counts.num_value("Count", 0), Some(1.0));
    assert_eq!(counts.str_value("Component", 0), Some("oxidane"));
    assert_eq!(counts.str_value("SMILES", 0), Some("O"));

    let filenames = Frame::read_csv_file(work.join("filename_counts.csv"), b';').unwrap();
    assert_eq!(filenames.str_value("Filename", 0), Some("j.fluid.2016.03.001"));
    assert_eq!(filenames.num_value("Count", 0), Some(1.0));
}
