//! Immutable engine configuration.
//!
//! The statutory lookup tables (bracket rates, category classification, unit
//! vocabulary) are configuration, not logic: they are loaded once, owned by a
//! [`FiscalConfig`], and passed explicitly into the tax engine and the code
//! generator. Tests substitute their own tables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::types::TaxBracket;

/// Statutory rate per bracket, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: [Decimal; 5],
}

impl RateTable {
    pub fn new(rates: [Decimal; 5]) -> Self {
        Self { rates }
    }

    pub fn rate(&self, bracket: TaxBracket) -> Decimal {
        self.rates[bracket.index()]
    }
}

impl Default for RateTable {
    /// The fixed statutory rates: A exempt, B standard 16 %, C zero-rated,
    /// D non-taxable, E reduced 8 %.
    fn default() -> Self {
        Self {
            rates: [dec!(0), dec!(16), dec!(0), dec!(0), dec!(8)],
        }
    }
}

/// Classification code reserved for categories with no specific mapping.
pub const MISC_CLASS_CODE: &str = "9999000100";

/// Default category → classification entries. Codes are 10-digit Authority
/// classification codes; the bracket column must stay consistent with
/// [`CLASS_BRACKETS`].
static CLASS_ENTRIES: &[(&str, &str)] = &[
    ("alcohol", "5022120300"),
    ("bakery", "5020210400"),
    ("beverage", "5022110200"),
    ("cleaning", "4713171200"),
    ("dairy", "5020220500"),
    ("deposit", "9999000300"),
    ("export", "9999000400"),
    ("food", "5020230100"),
    ("fuel", "1510151300"),
    ("gas", "1510161400"),
    ("grain", "5020180800"),
    ("meat", "5020190600"),
    ("medical", "5110181500"),
    ("packaging", "2412161100"),
    ("produce", "5020170700"),
    ("service", "9111811000"),
    ("voucher", "9999000200"),
    ("water", "5022100900"),
];

/// Default classification → bracket entries. Unprocessed produce, grain and
/// medical supplies are exempt (A); petroleum products carry the reduced
/// rate (E); vouchers and deposits are non-taxable (D); exports are
/// zero-rated (C); everything else is standard (B).
static CLASS_BRACKETS: &[(&str, TaxBracket)] = &[
    ("1510151300", TaxBracket::Reduced),
    ("1510161400", TaxBracket::Reduced),
    ("2412161100", TaxBracket::Standard),
    ("4713171200", TaxBracket::Standard),
    ("5020170700", TaxBracket::Exempt),
    ("5020180800", TaxBracket::Exempt),
    ("5020190600", TaxBracket::Standard),
    ("5020210400", TaxBracket::Standard),
    ("5020220500", TaxBracket::Standard),
    ("5020230100", TaxBracket::Standard),
    ("5022100900", TaxBracket::Standard),
    ("5022110200", TaxBracket::Standard),
    ("5022120300", TaxBracket::Standard),
    ("5110181500", TaxBracket::Exempt),
    ("9111811000", TaxBracket::Standard),
    ("9999000100", TaxBracket::Standard),
    ("9999000200", TaxBracket::NonTaxable),
    ("9999000300", TaxBracket::NonTaxable),
    ("9999000400", TaxBracket::ZeroRated),
];

/// Category → classification code → bracket mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTable {
    /// (category, class code), category matched case-insensitively.
    pub entries: Vec<(String, String)>,
    /// Fallback code for unknown categories.
    pub misc_code: String,
    /// (class code, bracket); codes absent here resolve to bracket B.
    pub brackets: Vec<(String, TaxBracket)>,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self {
            entries: CLASS_ENTRIES
                .iter()
                .map(|(c, code)| (c.to_string(), code.to_string()))
                .collect(),
            misc_code: MISC_CLASS_CODE.to_string(),
            brackets: CLASS_BRACKETS
                .iter()
                .map(|(code, b)| (code.to_string(), *b))
                .collect(),
        }
    }
}

/// Default quantity-unit code when the unit is unknown or blank.
pub const DEFAULT_UNIT_CODE: &str = "U";

/// The Authority's closed unit-of-measure vocabulary (40 codes).
/// Sorted for binary search.
static UNIT_CODES: &[&str] = &[
    "BA",  // Barrel
    "BE",  // Bundle
    "BG",  // Bag
    "BL",  // Block
    "BLL", // Barrel (petroleum)
    "BX",  // Box
    "CA",  // Can
    "CMT", // Centimetre
    "CR",  // Crate
    "CT",  // Carton
    "DR",  // Drum
    "DZ",  // Dozen
    "GLL", // Gallon
    "GRM", // Gram
    "GRO", // Gross
    "JR",  // Jar
    "KG",  // Kilogram
    "KTM", // Kilometre
    "KWT", // Kilowatt
    "L",   // Litre
    "LBR", // Pound
    "M",   // Metre
    "M2",  // Square metre
    "M3",  // Cubic metre
    "MGM", // Milligram
    "MLT", // Millilitre
    "NO",  // Number
    "PA",  // Packet
    "PK",  // Pack
    "PR",  // Pair
    "RL",  // Reel
    "RO",  // Roll
    "SA",  // Sack
    "SET", // Set
    "ST",  // Sheet
    "TNE", // Tonne
    "TU",  // Tube
    "TY",  // Tray
    "U",   // Piece/unit
    "YRD", // Yard
];

/// Default free-text synonym → unit code entries, matched case-insensitively
/// after trimming. Canonical codes map to themselves via the vocabulary, so
/// normalization is idempotent.
static UNIT_SYNONYMS: &[(&str, &str)] = &[
    ("bag", "BG"),
    ("bags", "BG"),
    ("barrel", "BA"),
    ("bottle", "U"),
    ("bottles", "U"),
    ("box", "BX"),
    ("boxes", "BX"),
    ("bunch", "BE"),
    ("bundle", "BE"),
    ("can", "CA"),
    ("cans", "CA"),
    ("carton", "CT"),
    ("cartons", "CT"),
    ("cm", "CMT"),
    ("crate", "CR"),
    ("crates", "CR"),
    ("dozen", "DZ"),
    ("dozens", "DZ"),
    ("drum", "DR"),
    ("each", "U"),
    ("ea", "U"),
    ("g", "GRM"),
    ("gallon", "GLL"),
    ("gallons", "GLL"),
    ("gram", "GRM"),
    ("grams", "GRM"),
    ("gm", "GRM"),
    ("gms", "GRM"),
    ("item", "U"),
    ("items", "U"),
    ("jar", "JR"),
    ("jars", "JR"),
    ("kg", "KG"),
    ("kgs", "KG"),
    ("kilo", "KG"),
    ("kilos", "KG"),
    ("kilogram", "KG"),
    ("kilograms", "KG"),
    ("l", "L"),
    ("lb", "LBR"),
    ("lbs", "LBR"),
    ("liter", "L"),
    ("liters", "L"),
    ("litre", "L"),
    ("litres", "L"),
    ("ltr", "L"),
    ("ltrs", "L"),
    ("m", "M"),
    ("meter", "M"),
    ("metre", "M"),
    ("mg", "MGM"),
    ("milligram", "MGM"),
    ("millilitre", "MLT"),
    ("milliliter", "MLT"),
    ("ml", "MLT"),
    ("mls", "MLT"),
    ("number", "NO"),
    ("pack", "PK"),
    ("packet", "PA"),
    ("packets", "PA"),
    ("packs", "PK"),
    ("pair", "PR"),
    ("pairs", "PR"),
    ("pc", "U"),
    ("pcs", "U"),
    ("piece", "U"),
    ("pieces", "U"),
    ("pound", "LBR"),
    ("pounds", "LBR"),
    ("roll", "RO"),
    ("rolls", "RO"),
    ("sack", "SA"),
    ("sacks", "SA"),
    ("set", "SET"),
    ("sets", "SET"),
    ("sheet", "ST"),
    ("sheets", "ST"),
    ("tin", "CA"),
    ("tins", "CA"),
    ("tonne", "TNE"),
    ("tonnes", "TNE"),
    ("tray", "TY"),
    ("trays", "TY"),
    ("tube", "TU"),
    ("tubes", "TU"),
    ("unit", "U"),
    ("units", "U"),
];

/// Free-text unit of measure → closed Authority vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTable {
    /// The closed vocabulary, sorted.
    pub codes: Vec<String>,
    /// (synonym, code), synonym matched case-insensitively after trimming.
    pub synonyms: Vec<(String, String)>,
    /// Fallback for unknown or blank units.
    pub default_code: String,
}

impl Default for UnitTable {
    fn default() -> Self {
        Self {
            codes: UNIT_CODES.iter().map(|c| c.to_string()).collect(),
            synonyms: UNIT_SYNONYMS
                .iter()
                .map(|(s, c)| (s.to_string(), c.to_string()))
                .collect(),
            default_code: DEFAULT_UNIT_CODE.to_string(),
        }
    }
}

/// The fixed leading segments of an item code:
/// `<country><type><packaging>` ahead of the unit code and 7-digit counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCodePrefix {
    /// ISO 3166-1 alpha-2 origin country.
    pub country: String,
    /// Single-character item type (2 = finished product).
    pub item_type: String,
    /// Two-character packaging code.
    pub packaging: String,
}

impl ItemCodePrefix {
    pub fn prefix(&self) -> String {
        format!("{}{}{}", self.country, self.item_type, self.packaging)
    }
}

impl Default for ItemCodePrefix {
    fn default() -> Self {
        Self {
            country: "KE".into(),
            item_type: "2".into(),
            packaging: "NT".into(),
        }
    }
}

/// Engine-wide configuration: business identity, device identity, and the
/// statutory tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalConfig {
    /// Business tax identifier (printed on receipts, first segment of the
    /// verification QR payload).
    pub tax_id: String,
    pub branch_id: String,
    /// Control-device identifier reproduced in the receipt device block.
    pub device_id: String,
    pub business_name: String,
    pub address: String,
    /// Registrant identity sent on payloads; capped to 20 characters when
    /// the payload is built.
    pub registrant_id: String,
    pub registrant_name: String,
    /// Closing message at the bottom of every receipt.
    pub receipt_footer: String,
    pub item_prefix: ItemCodePrefix,
    pub rates: RateTable,
    pub classes: ClassTable,
    pub units: UnitTable,
}

impl FiscalConfig {
    pub fn builder(
        tax_id: impl Into<String>,
        branch_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> FiscalConfigBuilder {
        FiscalConfigBuilder::new(tax_id, branch_id, device_id)
    }
}

/// Builder for [`FiscalConfig`].
///
/// # Example
///
/// ```
/// use risiti::core::FiscalConfig;
///
/// let config = FiscalConfig::builder("P051234567X", "00", "SCU-0042")
///     .business_name("Mama Oliech Restaurant")
///     .address("Marcus Garvey Rd, Nairobi")
///     .registrant("11", "Admin")
///     .build();
/// assert_eq!(config.branch_id, "00");
/// ```
pub struct FiscalConfigBuilder {
    config: FiscalConfig,
}

impl FiscalConfigBuilder {
    pub fn new(
        tax_id: impl Into<String>,
        branch_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            config: FiscalConfig {
                tax_id: tax_id.into(),
                branch_id: branch_id.into(),
                device_id: device_id.into(),
                business_name: String::new(),
                address: String::new(),
                registrant_id: "1".into(),
                registrant_name: "system".into(),
                receipt_footer: "THANK YOU — WELCOME AGAIN".into(),
                item_prefix: ItemCodePrefix::default(),
                rates: RateTable::default(),
                classes: ClassTable::default(),
                units: UnitTable::default(),
            },
        }
    }

    pub fn business_name(mut self, name: impl Into<String>) -> Self {
        self.config.business_name = name.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    pub fn registrant(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.registrant_id = id.into();
        self.config.registrant_name = name.into();
        self
    }

    pub fn receipt_footer(mut self, footer: impl Into<String>) -> Self {
        self.config.receipt_footer = footer.into();
        self
    }

    pub fn item_prefix(mut self, prefix: ItemCodePrefix) -> Self {
        self.config.item_prefix = prefix;
        self
    }

    pub fn rates(mut self, rates: RateTable) -> Self {
        self.config.rates = rates;
        self
    }

    pub fn classes(mut self, classes: ClassTable) -> Self {
        self.config.classes = classes;
        self
    }

    pub fn units(mut self, units: UnitTable) -> Self {
        self.config.units = units;
        self
    }

    pub fn build(self) -> FiscalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates_are_statutory() {
        let rates = RateTable::default();
        assert_eq!(rates.rate(TaxBracket::Exempt), dec!(0));
        assert_eq!(rates.rate(TaxBracket::Standard), dec!(16));
        assert_eq!(rates.rate(TaxBracket::ZeroRated), dec!(0));
        assert_eq!(rates.rate(TaxBracket::NonTaxable), dec!(0));
        assert_eq!(rates.rate(TaxBracket::Reduced), dec!(8));
    }

    #[test]
    fn unit_codes_sorted_for_binary_search() {
        for window in UNIT_CODES.windows(2) {
            assert!(
                window[0] < window[1],
                "unit codes not sorted: {} >= {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn unit_vocabulary_is_closed_at_forty() {
        assert_eq!(UNIT_CODES.len(), 40);
    }

    #[test]
    fn every_synonym_targets_a_known_code() {
        for (synonym, code) in UNIT_SYNONYMS {
            assert!(
                UNIT_CODES.binary_search(code).is_ok(),
                "synonym '{synonym}' maps to unknown code '{code}'"
            );
        }
    }

    #[test]
    fn every_class_entry_has_a_bracket() {
        for (category, code) in CLASS_ENTRIES {
            assert!(
                CLASS_BRACKETS.iter().any(|(c, _)| c == code),
                "category '{category}' maps to class '{code}' with no bracket entry"
            );
        }
        assert!(CLASS_BRACKETS.iter().any(|(c, _)| c == &MISC_CLASS_CODE));
    }

    #[test]
    fn default_prefix_composes() {
        assert_eq!(ItemCodePrefix::default().prefix(), "KE2NT");
    }
}
