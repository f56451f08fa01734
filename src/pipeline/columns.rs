//! Column names as constants for type safety

/// Source ThermoML file the measurement came from
pub const FILENAME: &str = "filename";
/// Composite mixture identifier, two names joined by `__`
pub const COMPONENTS: &str = "components";
/// First component name after the arity split
pub const COMPONENT_0: &str = "component_0";
/// Second component name after the arity split
pub const COMPONENT_1: &str = "component_1";
/// Molecular formula of the first component
pub const FORMULA_0: &str = "formula_0";
/// Molecular formula of the second component
pub const FORMULA_1: &str = "formula_1";
/// Measurement temperature in kelvin
pub const TEMPERATURE: &str = "Temperature, K";
/// Measurement pressure in kilopascal
pub const PRESSURE: &str = "Pressure, kPa";
/// Physical state of the measured sample
pub const PHASE: &str = "phase";
/// Activity coefficient measurement
pub const ACTIVITY_COEFFICIENT: &str = "Activity coefficient";
/// Standard deviation of the activity coefficient
pub const ACTIVITY_COEFFICIENT_STD: &str = "Activity coefficient_std";
/// Relative activity measurement
pub const RELATIVE_ACTIVITY: &str = "(Relative) activity";
/// Standard deviation of the relative activity
pub const RELATIVE_ACTIVITY_STD: &str = "(Relative) activity_std";
/// SMILES of the first component
pub const SMILES_0: &str = "SMILES_0";
/// SMILES of the second component
pub const SMILES_1: &str = "SMILES_1";
/// CAS registry number of the first component
pub const CAS_0: &str = "cas_0";
/// CAS registry number of the second component
pub const CAS_1: &str = "cas_1";
/// Standard InChI key of the first component
pub const INCHI_0: &str = "InChI_0";
/// Standard InChI key of the second component
pub const INCHI_1: &str = "InChI_1";
/// Total atom count of the first component
pub const N_ATOMS_0: &str = "n_atoms_0";
/// Total atom count of the second component
pub const N_ATOMS_1: &str = "n_atoms_1";
/// Heavy-atom count of the first component
pub const N_HEAVY_ATOMS_0: &str = "n_heavy_atoms_0";
/// Heavy-atom count of the second component
pub const N_HEAVY_ATOMS_1: &str = "n_heavy_atoms_1";
/// Allowed-set atom count of the first component
pub const N_DESIRED_ATOMS_0: &str = "n_desired_atoms_0";
/// Allowed-set atom count of the second component
pub const N_DESIRED_ATOMS_1: &str = "n_desired_atoms_1";
/// Atoms of the first component outside the allowed set
pub const N_OTHER_ATOMS_0: &str = "n_other_atoms_0";
/// Atoms of the second component outside the allowed set
pub const N_OTHER_ATOMS_1: &str = "n_other_atoms_1";

/// The two tracked experiment columns; a row must report at least one.
pub const EXPERIMENTS: &[&str] = &[ACTIVITY_COEFFICIENT, RELATIVE_ACTIVITY];

/// Measurement columns that may be absent from a raw export. The loader adds
/// missing ones as all-null so the projection can read them by name.
pub const OPTIONAL_MEASUREMENTS: &[&str] = &[
    ACTIVITY_COEFFICIENT,
    ACTIVITY_COEFFICIENT_STD,
    RELATIVE_ACTIVITY,
    RELATIVE_ACTIVITY_STD,
    PRESSURE,
];

/// Columns some later stage reads by name. All-null-column housekeeping
/// must never remove these, no matter which stage runs it.
pub const RETAINED: &[&str] = &[
    FILENAME,
    COMPONENT_0,
    COMPONENT_1,
    FORMULA_0,
    FORMULA_1,
    SMILES_0,
    SMILES_1,
    CAS_0,
    CAS_1,
    INCHI_0,
    INCHI_1,
    TEMPERATURE,
    PRESSURE,
    PHASE,
    ACTIVITY_COEFFICIENT,
    ACTIVITY_COEFFICIENT_STD,
    RELATIVE_ACTIVITY,
    RELATIVE_ACTIVITY_STD,
    N_HEAVY_ATOMS_0,
    N_HEAVY_ATOMS_1,
    N_OTHER_ATOMS_0,
    N_OTHER_ATOMS_1,
];

/// The fifteen columns of the projected output table, in order.
pub const PROJECTED: &[&str] = &[
    FILENAME,
    COMPONENT_0,
    COMPONENT_1,
    SMILES_0,
    SMILES_1,
    CAS_0,
    CAS_1,
    INCHI_0,
    INCHI_1,
    TEMPERATURE,
    PRESSURE,
    ACTIVITY_COEFFICIENT,
    ACTIVITY_COEFFICIENT_STD,
    RELATIVE_ACTIVITY,
    RELATIVE_ACTIVITY_STD,
];
