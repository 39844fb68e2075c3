//! Core data model, configuration, and the offline components: tax bracket
//! computation, catalog code generation, and sequence allocation.

pub mod codes;
pub mod config;
mod error;
pub mod ledger;
pub mod numbering;
pub mod tax;
pub mod timestamp;
mod types;
pub mod validation;

pub use codes::{classify, normalize_unit, tax_bracket_for};
pub use config::{
    ClassTable, FiscalConfig, FiscalConfigBuilder, ItemCodePrefix, RateTable, UnitTable,
    DEFAULT_UNIT_CODE, MISC_CLASS_CODE,
};
pub use error::{FiscalError, LedgerError, ValidationError};
pub(crate) use error::validation_failure;
pub use ledger::{Ledger, MemoryLedger};
pub use numbering::{
    compose_item_code, item_code_counter, next_invoice_number, next_item_code, COUNTER_WIDTH,
};
pub use tax::compute_breakdown;
pub use timestamp::CompactTimestamp;
pub use types::{
    Acknowledgement, CatalogItem, Customer, DiscountKind, ItemDraft, ItemStatus, LineBreakdown,
    PaymentMethod, Sale, SaleDraft, SaleLine, SubmissionRecord, SubmissionStatus, TaxBracket,
    TaxBreakdown,
};
pub use validation::{validate_item_draft, validate_sale_draft};
