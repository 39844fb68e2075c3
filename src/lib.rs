//! # risiti
//!
//! Fiscal transaction engine for a national electronic tax invoicing system:
//! gap-free sequence and item-code allocation, the five-bracket tax
//! computation with proportional discount allocation, the idempotent
//! submit/acknowledge/retry state machine against the Authority's remote
//! service, and receipt rendering in the Authority's mandated layout with an
//! embedded verification QR.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Storage is pluggable through the [`core::Ledger`] trait; the Authority
//! transport through [`authority::AuthorityClient`].
//!
//! ## Quick Start
//!
//! ```rust
//! use risiti::core::*;
//! use rust_decimal_macros::dec;
//!
//! let lines = vec![
//!     SaleLine {
//!         name: "Nyama Choma".into(),
//!         item_code: None,
//!         item_class_code: None,
//!         quantity: dec!(2),
//!         unit_price: dec!(100),
//!         bracket: Some(TaxBracket::Standard),
//!     },
//!     SaleLine {
//!         name: "Market Greens".into(),
//!         item_code: None,
//!         item_class_code: None,
//!         quantity: dec!(1),
//!         unit_price: dec!(50),
//!         bracket: Some(TaxBracket::Exempt),
//!     },
//! ];
//!
//! let breakdown = compute_breakdown(&lines, dec!(30), &RateTable::default()).unwrap();
//! assert_eq!(breakdown.total_taxable, dec!(220));
//! assert_eq!(breakdown.total_tax, dec!(28.16));
//! assert_eq!(breakdown.grand_total, dec!(248.16));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Data model, tax brackets, code generation, sequencing, receipt text/ESC-POS |
//! | `authority` | Wire protocol, HTTP client, submission state machine |
//! | `pdf` | Paginated PDF receipt rendering |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod receipt;

#[cfg(feature = "authority")]
pub mod authority;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
