//! Catalog code generation: category classification, bracket derivation, and
//! unit-of-measure normalization against the Authority's closed vocabularies.
//!
//! All lookups trim whitespace and match case-insensitively. Fallbacks are
//! fixed: unknown category → the reserved miscellaneous class code, unknown
//! class code → bracket B, unknown or blank unit → the default unit code.

use super::config::{ClassTable, UnitTable};
use super::types::TaxBracket;

/// Map a free-text category to the Authority's classification code.
pub fn classify(category: &str, classes: &ClassTable) -> String {
    let wanted = category.trim();
    classes
        .entries
        .iter()
        .find(|(cat, _)| cat.eq_ignore_ascii_case(wanted))
        .map(|(_, code)| code.clone())
        .unwrap_or_else(|| classes.misc_code.clone())
}

/// Derive the tax bracket for a classification code.
pub fn tax_bracket_for(class_code: &str, classes: &ClassTable) -> TaxBracket {
    let wanted = class_code.trim();
    classes
        .brackets
        .iter()
        .find(|(code, _)| code == wanted)
        .map(|(_, bracket)| *bracket)
        .unwrap_or(TaxBracket::Standard)
}

/// Normalize a free-text unit of measure to the closed vocabulary.
///
/// Canonical codes pass through unchanged, so the function is idempotent:
/// `normalize_unit(normalize_unit(x)) == normalize_unit(x)`.
pub fn normalize_unit(unit: &str, units: &UnitTable) -> String {
    let wanted = unit.trim();
    if wanted.is_empty() {
        return units.default_code.clone();
    }
    if let Some(code) = units
        .codes
        .iter()
        .find(|code| code.eq_ignore_ascii_case(wanted))
    {
        return code.clone();
    }
    units
        .synonyms
        .iter()
        .find(|(synonym, _)| synonym.eq_ignore_ascii_case(wanted))
        .map(|(_, code)| code.clone())
        .unwrap_or_else(|| units.default_code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DEFAULT_UNIT_CODE, MISC_CLASS_CODE};

    #[test]
    fn classify_is_case_insensitive_and_trims() {
        let classes = ClassTable::default();
        assert_eq!(classify("Food", &classes), classify("  food ", &classes));
        assert_eq!(classify("BEVERAGE", &classes), "5022110200");
    }

    #[test]
    fn unknown_category_falls_back_to_miscellaneous() {
        let classes = ClassTable::default();
        assert_eq!(classify("quantum widgets", &classes), MISC_CLASS_CODE);
        assert_eq!(classify("", &classes), MISC_CLASS_CODE);
    }

    #[test]
    fn bracket_follows_classification() {
        let classes = ClassTable::default();
        assert_eq!(
            tax_bracket_for(&classify("produce", &classes), &classes),
            TaxBracket::Exempt
        );
        assert_eq!(
            tax_bracket_for(&classify("fuel", &classes), &classes),
            TaxBracket::Reduced
        );
        assert_eq!(
            tax_bracket_for(&classify("voucher", &classes), &classes),
            TaxBracket::NonTaxable
        );
    }

    #[test]
    fn unknown_class_code_defaults_to_standard() {
        let classes = ClassTable::default();
        assert_eq!(tax_bracket_for("0000000000", &classes), TaxBracket::Standard);
    }

    // Classification and bracket derivation must stay mutually consistent:
    // every category resolves to a class code that resolves to a bracket.
    #[test]
    fn classification_and_brackets_are_consistent() {
        let classes = ClassTable::default();
        for (category, _) in &classes.entries {
            let code = classify(category, &classes);
            assert!(
                classes.brackets.iter().any(|(c, _)| *c == code),
                "category '{category}' resolves to unmapped class '{code}'"
            );
        }
    }

    #[test]
    fn normalize_unit_known_synonyms() {
        let units = UnitTable::default();
        assert_eq!(normalize_unit("pcs", &units), "U");
        assert_eq!(normalize_unit("Kilograms", &units), "KG");
        assert_eq!(normalize_unit(" litre ", &units), "L");
        assert_eq!(normalize_unit("TRAY", &units), "TY");
    }

    #[test]
    fn normalize_unit_passes_canonical_codes_through() {
        let units = UnitTable::default();
        assert_eq!(normalize_unit("KG", &units), "KG");
        assert_eq!(normalize_unit("kg", &units), "KG");
        assert_eq!(normalize_unit("u", &units), "U");
    }

    #[test]
    fn normalize_unit_fallbacks() {
        let units = UnitTable::default();
        assert_eq!(normalize_unit("", &units), DEFAULT_UNIT_CODE);
        assert_eq!(normalize_unit("   ", &units), DEFAULT_UNIT_CODE);
        assert_eq!(normalize_unit("furlongs", &units), DEFAULT_UNIT_CODE);
    }

    #[test]
    fn normalize_unit_is_idempotent() {
        let units = UnitTable::default();
        for (synonym, _) in &units.synonyms {
            let once = normalize_unit(synonym, &units);
            assert_eq!(normalize_unit(&once, &units), once);
        }
    }
}
