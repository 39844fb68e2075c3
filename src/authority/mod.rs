//! Submission to the Authority's electronic invoicing service.
//!
//! [`protocol`] holds the fixed wire contract, [`client`] the HTTP transport,
//! and [`engine`] the idempotent submit/acknowledge/retry state machine that
//! orchestrates allocation, tax computation, the remote call, and outcome
//! persistence.
//!
//! # Example
//!
//! ```no_run
//! use risiti::authority::{FiscalEngine, HttpAuthorityClient};
//! use risiti::core::{FiscalConfig, MemoryLedger, SaleDraft};
//!
//! # async fn run(draft: SaleDraft) -> Result<(), risiti::core::FiscalError> {
//! let config = FiscalConfig::builder("P051234567X", "00", "SCU-0042").build();
//! let client = HttpAuthorityClient::new("https://authority.example/api")?;
//! let engine = FiscalEngine::new(config, MemoryLedger::new(), client);
//!
//! let outcome = engine.submit_sale(draft).await?;
//! println!("{}", outcome.receipt.text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod engine;
pub mod protocol;

pub use client::{AuthorityClient, HttpAuthorityClient};
pub use engine::{FiscalEngine, RetryReport, SaleOutcome};
pub use protocol::{
    build_invoice_request, build_item_request, AckData, AuthorityResponse, InvoiceLine,
    InvoiceRequest, ItemRequest, IDENTITY_MAX, RESULT_ACCEPTED,
};
