//! The persistence seam.
//!
//! The engine owns no storage; everything it reads or writes goes through
//! [`Ledger`]. Implementations decide transactional strength — in particular
//! [`Ledger::allocate_invoice_number`] should be overridden with an atomic
//! read-increment-write where the backing store supports one.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::LedgerError;
use super::types::{CatalogItem, Sale};

/// Storage operations required by the fiscal engine.
pub trait Ledger {
    /// Highest invoice sequence value in the transaction log, across failed
    /// and successful submissions alike. `None` on an empty log.
    fn max_invoice_number(&self) -> Result<Option<u64>, LedgerError>;

    /// All stored catalog codes starting with `prefix`, scanned across
    /// **every** store that can hold catalog items. Used by the item-code
    /// allocator; missing a store here silently re-issues sequences.
    fn catalog_codes(&self, prefix: &str) -> Result<Vec<String>, LedgerError>;

    fn find_item(&self, id: &str) -> Result<Option<CatalogItem>, LedgerError>;

    fn upsert_item(&self, item: &CatalogItem) -> Result<(), LedgerError>;

    /// Insert or replace a sale and its submission record, keyed by the
    /// sale's business reference.
    fn record_sale(&self, sale: &Sale) -> Result<(), LedgerError>;

    fn find_sale(&self, reference: &str) -> Result<Option<Sale>, LedgerError>;

    /// Whether a submission for this business key already reached `Success`.
    fn has_succeeded(&self, reference: &str) -> Result<bool, LedgerError>;

    /// Every sale whose submission record is in the `Error` state, for the
    /// caller-triggered batch retry.
    fn failed_sales(&self) -> Result<Vec<Sale>, LedgerError>;

    /// Post-sale stock adjustment. Best effort: the engine logs a failure
    /// here and continues, it never fails the primary transaction.
    fn adjust_stock(&self, sale: &Sale) -> Result<(), LedgerError> {
        let _ = sale;
        Ok(())
    }

    /// Reserve the next invoice number.
    ///
    /// The default implementation is the plain `max + 1` read and inherits
    /// its documented race: two concurrent callers can observe the same
    /// maximum. Stores with transactional counters should override this with
    /// an atomic increment to make numbering gap-free and collision-free.
    /// Reserved numbers are never reclaimed — a rejected submission burns
    /// its number permanently; uniqueness, not conservation, is the audited
    /// invariant.
    fn allocate_invoice_number(&self) -> Result<u64, LedgerError> {
        Ok(self.max_invoice_number()?.unwrap_or(0) + 1)
    }
}

#[derive(Default)]
struct MemoryStores {
    sales: HashMap<String, Sale>,
    catalog: HashMap<String, CatalogItem>,
    /// Codes imported from a predecessor system. A second store so the
    /// prefix scan genuinely covers more than one collection.
    legacy_codes: Vec<String>,
}

/// In-memory [`Ledger`] for tests and demos.
#[derive(Default)]
pub struct MemoryLedger {
    stores: RwLock<MemoryStores>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog code into the legacy store.
    pub fn seed_legacy_code(&self, code: impl Into<String>) {
        self.stores
            .write()
            .expect("ledger lock poisoned")
            .legacy_codes
            .push(code.into());
    }

    pub fn sale_count(&self) -> usize {
        self.stores.read().expect("ledger lock poisoned").sales.len()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::new("ledger lock poisoned")
}

impl Ledger for MemoryLedger {
    fn max_invoice_number(&self) -> Result<Option<u64>, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        Ok(stores.sales.values().map(|s| s.invoice_number).max())
    }

    fn catalog_codes(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        let mut codes: Vec<String> = stores
            .catalog
            .values()
            .map(|item| item.item_code.clone())
            .chain(stores.legacy_codes.iter().cloned())
            .filter(|code| code.starts_with(prefix))
            .collect();
        codes.sort();
        Ok(codes)
    }

    fn find_item(&self, id: &str) -> Result<Option<CatalogItem>, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        Ok(stores.catalog.get(id).cloned())
    }

    fn upsert_item(&self, item: &CatalogItem) -> Result<(), LedgerError> {
        let mut stores = self.stores.write().map_err(poisoned)?;
        stores.catalog.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn record_sale(&self, sale: &Sale) -> Result<(), LedgerError> {
        let mut stores = self.stores.write().map_err(poisoned)?;
        stores.sales.insert(sale.reference.clone(), sale.clone());
        Ok(())
    }

    fn find_sale(&self, reference: &str) -> Result<Option<Sale>, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        Ok(stores.sales.get(reference).cloned())
    }

    fn has_succeeded(&self, reference: &str) -> Result<bool, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        Ok(stores
            .sales
            .get(reference)
            .is_some_and(|s| s.submission.is_success()))
    }

    fn failed_sales(&self) -> Result<Vec<Sale>, LedgerError> {
        let stores = self.stores.read().map_err(poisoned)?;
        let mut failed: Vec<Sale> = stores
            .sales
            .values()
            .filter(|s| s.submission.is_error())
            .cloned()
            .collect();
        failed.sort_by_key(|s| s.invoice_number);
        Ok(failed)
    }
}
