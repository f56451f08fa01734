//! # Chemical Formula Analyzer
//!
//! Parses Hill-style molecular formulas ("C2H6O", "CCl4") into element/count
//! pairs and answers the atom-count queries the element-composition and size
//! filters need. Element symbols are one uppercase letter optionally followed
//! by one lowercase letter; the two-character form is matched first so "Cl"
//! is never read as "C" followed by a stray "l". Subscripts may have multiple
//! digits, and a missing subscript means one atom.

/// Errors raised while parsing a formula string
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    /// Empty or whitespace-only formula string
    #[error("Empty formula string")]
    Empty,

    /// Character that cannot start an element symbol or subscript
    #[error("Malformed formula '{formula}': unexpected character '{found}' at position {position}")]
    Malformed {
        formula: String,
        found: char,
        position: usize,
    },

    /// Subscript too large to represent
    #[error("Malformed formula '{formula}': subscript overflow at position {position}")]
    SubscriptOverflow { formula: String, position: usize },
}

/// Heavy atoms tracked by the curation filters (everything but hydrogen).
pub const HEAVY_ELEMENTS: &[&str] = &["C", "O", "N", "P", "S", "Cl", "F"];

/// Full allowed element set: heavy atoms plus hydrogen.
pub const DESIRED_ELEMENTS: &[&str] = &["H", "C", "O", "N", "P", "S", "Cl", "F"];

/// Parse a formula into element/count pairs, in order of appearance.
/// Repeated symbols ("CH3CH3") are kept as separate pairs.
pub fn parse_formula(formula: &str) -> Result<Vec<(String, u32)>, FormulaError> {
    let trimmed = formula.trim();
    if trimmed.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut pairs = Vec::new();
    let mut chars = trimmed.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        if !c.is_ascii_uppercase() {
            return Err(FormulaError::Malformed {
                formula: formula.to_string(),
                found: c,
                position,
            });
        }

        let mut symbol = String::from(c);
        // Longest match: a trailing lowercase letter belongs to the symbol.
        if let Some(&(_, lower)) = chars.peek() {
            if lower.is_ascii_lowercase() {
                symbol.push(lower);
                chars.next();
            }
        }

        let mut count: Option<u32> = None;
        while let Some(&(digit_pos, digit)) = chars.peek() {
            if let Some(d) = digit.to_digit(10) {
                let next = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(d))
                    .ok_or_else(|| FormulaError::SubscriptOverflow {
                        formula: formula.to_string(),
                        position: digit_pos,
                    })?;
                count = Some(next);
                chars.next();
            } else {
                break;
            }
        }

        pairs.push((symbol, count.unwrap_or(1)));
    }

    Ok(pairs)
}

/// Total number of atoms in the formula, respecting multi-digit subscripts.
pub fn count_atoms(formula: &str) -> Result<u32, FormulaError> {
    Ok(parse_formula(formula)?.iter().map(|(_, n)| n).sum())
}

/// Number of atoms restricted to the named elements.
pub fn count_atoms_in_set(formula: &str, elements: &[&str]) -> Result<u32, FormulaError> {
    Ok(parse_formula(formula)?
        .iter()
        .filter(|(symbol, _)| elements.contains(&symbol.as_str()))
        .map(|(_, n)| n)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_simple_formula() {
        let pairs = parse_formula("H2O").unwrap();
        assert_eq!(pairs, vec![("H".to_string(), 2), ("O".to_string(), 1)]);
    }

    #[test]
    fn test_two_character_symbols_match_first() {
        // "Cl" must not be read as "C" + "l".
        let pairs = parse_formula("CCl4").unwrap();
        assert_eq!(pairs, vec![("C".to_string(), 1), ("Cl".to_string(), 4)]);
    }

    #[test]
    fn test_multi_digit_subscripts() {
        assert_eq!(count_atoms("C12H26").unwrap(), 38);
    }

    #[test]
    fn test_repeated_symbols_accumulate() {
        assert_eq!(count_atoms("CH3CH3").unwrap(), 8);
        assert_eq!(count_atoms_in_set("CH3CH3", &["C"]).unwrap(), 2);
    }

    #[test]
    fn test_count_atoms_in_set() {
        // Ethanol: 2 C, 6 H, 1 O.
        assert_eq!(count_atoms_in_set("C2H6O", HEAVY_ELEMENTS).unwrap(), 3);
        assert_eq!(count_atoms_in_set("C2H6O", DESIRED_ELEMENTS).unwrap(), 9);
        assert_eq!(count_atoms_in_set("C2H6O", &["S"]).unwrap(), 0);
    }

    #[test]
    fn test_bromine_counts_outside_desired_set() {
        let total = count_atoms("CH3Br").unwrap();
        let desired = count_atoms_in_set("CH3Br", DESIRED_ELEMENTS).unwrap();
        assert_eq!(total - desired, 1);
    }

    #[test]
    fn test_empty_formula_rejected() {
        assert!(matches!(parse_formula(""), Err(FormulaError::Empty)));
        assert!(matches!(parse_formula("   "), Err(FormulaError::Empty)));
    }

    #[test]
    fn test_malformed_formulas_rejected() {
        assert!(matches!(
            parse_formula("2H"),
            Err(FormulaError::Malformed { found: '2', .. })
        ));
        assert!(matches!(
            parse_formula("H2O)"),
            Err(FormulaError::Malformed { found: ')', .. })
        ));
        // A lone lowercase letter cannot start a symbol.
        assert!(matches!(
            parse_formula("h2o"),
            Err(FormulaError::Malformed { found: 'h', .. })
        ));
    }

    proptest! {
        /// Formulas assembled from known symbol/count pairs always parse back
        /// to the same total atom count.
        #[test]
        fn prop_total_matches_constructed_formula(
            pairs in prop::collection::vec(
                (prop::sample::select(vec!["H", "C", "O", "N", "P", "S", "Cl", "F", "Br", "Si"]),
                 1u32..500),
                1..8,
            )
        ) {
            let formula: String = pairs
                .iter()
                .map(|(symbol, n)| format!("{symbol}{n}"))
                .collect();
            let expected: u32 = pairs.iter().map(|(_, n)| n).sum();
            prop_assert_eq!(count_atoms(&formula).unwrap(), expected);
        }

        /// The restricted count never exceeds the total count.
        #[test]
        fn prop_subset_count_bounded_by_total(
            pairs in prop::collection::vec(
                (prop::sample::select(vec!["H", "C", "O", "Cl", "Br"]), 1u32..100),
                1..6,
            )
        ) {
            let formula: String = pairs
                .iter()
                .map(|(symbol, n)| format!("{symbol}{n}"))
                .collect();
            let total = count_atoms(&formula).unwrap();
            let subset = count_atoms_in_set(&formula, HEAVY_ELEMENTS).unwrap();
            prop_assert!(subset <= total);
        }
    }
}
