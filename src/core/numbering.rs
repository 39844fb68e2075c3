//! Sequence and item-code allocation.
//!
//! Both allocators are **read only**: they compute `max + 1` over the ledger
//! and return it without reserving anything — nothing advances until the
//! caller persists. The reserving path is
//! [`Ledger::allocate_invoice_number`](super::ledger::Ledger::allocate_invoice_number).
//!
//! A ledger read failure always propagates. Falling back to `1` on an
//! unreadable ledger would mint colliding sequences undetectably.

use super::config::ItemCodePrefix;
use super::error::FiscalError;
use super::ledger::Ledger;

/// Width of the trailing item-code counter.
pub const COUNTER_WIDTH: usize = 7;

const COUNTER_MAX: u64 = 9_999_999;

/// Next invoice sequence number: highest stored value plus one, starting
/// at 1 on an empty log.
pub fn next_invoice_number<L: Ledger>(ledger: &L) -> Result<u64, FiscalError> {
    Ok(ledger.max_invoice_number()?.unwrap_or(0) + 1)
}

/// Next item code in the `unit_code` namespace:
/// `<prefix><unitCode><7-digit-counter>`.
///
/// Scans every stored code matching the prefix + unit, takes the highest
/// trailing counter, and zero-pads the increment. Codes whose tail is not
/// exactly seven digits are ignored — they belong to other namespaces or
/// predate the scheme. The unit code must already be normalized
/// ([`normalize_unit`](super::codes::normalize_unit)).
pub fn next_item_code<L: Ledger>(
    ledger: &L,
    prefix: &ItemCodePrefix,
    unit_code: &str,
) -> Result<String, FiscalError> {
    let namespace = format!("{}{}", prefix.prefix(), unit_code);
    let highest = ledger
        .catalog_codes(&namespace)?
        .iter()
        .filter_map(|code| item_code_counter(code, &namespace))
        .max()
        .unwrap_or(0);

    if highest >= COUNTER_MAX {
        return Err(FiscalError::Allocation(format!(
            "item code namespace '{namespace}' is exhausted"
        )));
    }

    Ok(compose_item_code(prefix, unit_code, highest + 1))
}

/// Compose `<prefix><unitCode><counter>` with the counter zero-padded to
/// seven digits.
pub fn compose_item_code(prefix: &ItemCodePrefix, unit_code: &str, counter: u64) -> String {
    format!(
        "{}{}{:0>width$}",
        prefix.prefix(),
        unit_code,
        counter,
        width = COUNTER_WIDTH
    )
}

/// Extract the trailing 7-digit counter from a code in `namespace`
/// (`prefix + unit code`). Fixed-width parse; `None` when the code does not
/// belong to the namespace or its tail is not exactly seven ASCII digits.
pub fn item_code_counter(code: &str, namespace: &str) -> Option<u64> {
    let tail = code.strip_prefix(namespace)?;
    if tail.len() != COUNTER_WIDTH || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LedgerError;
    use crate::core::ledger::MemoryLedger;
    use crate::core::types::{CatalogItem, Sale};

    fn prefix() -> ItemCodePrefix {
        ItemCodePrefix::default()
    }

    #[test]
    fn empty_ledger_starts_at_one() {
        let ledger = MemoryLedger::new();
        assert_eq!(next_invoice_number(&ledger).unwrap(), 1);
        assert_eq!(
            next_item_code(&ledger, &prefix(), "U").unwrap(),
            "KE2NTU0000001"
        );
    }

    #[test]
    fn allocator_is_read_only() {
        let ledger = MemoryLedger::new();
        let first = next_item_code(&ledger, &prefix(), "U").unwrap();
        let second = next_item_code(&ledger, &prefix(), "U").unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("0000001"));
    }

    #[test]
    fn counter_scans_all_stores() {
        let ledger = MemoryLedger::new();
        ledger.seed_legacy_code("KE2NTU0000412");
        assert_eq!(
            next_item_code(&ledger, &prefix(), "U").unwrap(),
            "KE2NTU0000413"
        );
    }

    #[test]
    fn namespaces_are_independent() {
        let ledger = MemoryLedger::new();
        ledger.seed_legacy_code("KE2NTU0000412");
        assert_eq!(
            next_item_code(&ledger, &prefix(), "KG").unwrap(),
            "KE2NTKG0000001"
        );
    }

    #[test]
    fn malformed_tails_are_ignored() {
        let ledger = MemoryLedger::new();
        ledger.seed_legacy_code("KE2NTU12345");
        ledger.seed_legacy_code("KE2NTU123456789");
        ledger.seed_legacy_code("KE2NTUABCDEFG");
        ledger.seed_legacy_code("KE2NTU0000007");
        assert_eq!(
            next_item_code(&ledger, &prefix(), "U").unwrap(),
            "KE2NTU0000008"
        );
    }

    #[test]
    fn exhausted_namespace_is_an_error() {
        let ledger = MemoryLedger::new();
        ledger.seed_legacy_code("KE2NTU9999999");
        assert!(matches!(
            next_item_code(&ledger, &prefix(), "U"),
            Err(FiscalError::Allocation(_))
        ));
    }

    #[test]
    fn counter_parse_is_fixed_width() {
        assert_eq!(item_code_counter("KE2NTU0000001", "KE2NTU"), Some(1));
        assert_eq!(item_code_counter("KE2NTU9999999", "KE2NTU"), Some(9_999_999));
        assert_eq!(item_code_counter("KE2NTU000001", "KE2NTU"), None);
        assert_eq!(item_code_counter("KE2NTU00000001", "KE2NTU"), None);
        assert_eq!(item_code_counter("KE2NTKG0000001", "KE2NTU"), None);
        assert_eq!(item_code_counter("XX2NTU0000001", "KE2NTU"), None);
    }

    struct UnreadableLedger;

    impl Ledger for UnreadableLedger {
        fn max_invoice_number(&self) -> Result<Option<u64>, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn catalog_codes(&self, _: &str) -> Result<Vec<String>, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn find_item(&self, _: &str) -> Result<Option<CatalogItem>, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn upsert_item(&self, _: &CatalogItem) -> Result<(), LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn record_sale(&self, _: &Sale) -> Result<(), LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn find_sale(&self, _: &str) -> Result<Option<Sale>, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn has_succeeded(&self, _: &str) -> Result<bool, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
        fn failed_sales(&self) -> Result<Vec<Sale>, LedgerError> {
            Err(LedgerError::new("disk on fire"))
        }
    }

    // An unreadable ledger must never yield sequence 1.
    #[test]
    fn unreadable_ledger_propagates() {
        assert!(matches!(
            next_invoice_number(&UnreadableLedger),
            Err(FiscalError::Ledger(_))
        ));
        assert!(matches!(
            next_item_code(&UnreadableLedger, &prefix(), "U"),
            Err(FiscalError::Ledger(_))
        ));
    }
}
