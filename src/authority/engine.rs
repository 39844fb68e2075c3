//! The submission state machine.
//!
//! Owns the `NotSubmitted → Pending → {Success, Error}` lifecycle of every
//! sale and catalog registration. `Error` may be retried; `Success` is
//! terminal and a second submission for the same business key is refused.
//!
//! Ordering is deliberate: sequence numbers and item codes are allocated
//! **before** the remote call and never reclaimed, while the business record
//! is persisted only **after** the remote call returns — success is never
//! recorded ahead of confirmation, and a rejected attempt keeps its
//! allocated numbers for the retry path.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::client::AuthorityClient;
use super::protocol::{build_invoice_request, build_item_request, AuthorityResponse};
use crate::core::tax::round_half_up;
use crate::core::{
    classify, compute_breakdown, next_item_code, normalize_unit, tax_bracket_for,
    validate_item_draft, validate_sale_draft, validation_failure, CatalogItem, DiscountKind,
    FiscalConfig, FiscalError, ItemDraft, ItemStatus, Ledger, Sale, SaleDraft, SubmissionRecord,
    SubmissionStatus,
};
use crate::receipt::{self, Receipt};

/// A successfully submitted sale with its rendered receipt.
#[derive(Debug)]
pub struct SaleOutcome {
    pub sale: Sale,
    pub receipt: Receipt,
}

/// Result of one caller-triggered batch retry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryReport {
    pub retried: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Orchestrates allocation, tax computation, the remote Authority call, and
/// outcome persistence.
pub struct FiscalEngine<L, C> {
    config: FiscalConfig,
    ledger: L,
    client: C,
}

impl<L: Ledger, C: AuthorityClient> FiscalEngine<L, C> {
    pub fn new(config: FiscalConfig, ledger: L, client: C) -> Self {
        Self {
            config,
            ledger,
            client,
        }
    }

    pub fn config(&self) -> &FiscalConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Register a catalog item with the Authority, assigning its item code,
    /// classification code, and tax bracket.
    ///
    /// Re-registering an errored item reuses its already-allocated codes; a
    /// successfully registered item is refused.
    pub async fn register_item(&self, draft: ItemDraft) -> Result<CatalogItem, FiscalError> {
        let errors = validate_item_draft(&draft);
        if !errors.is_empty() {
            return Err(validation_failure(errors));
        }

        let existing = self.ledger.find_item(&draft.id)?;
        if let Some(prev) = &existing {
            if prev.status == ItemStatus::Registered {
                return Err(FiscalError::AlreadySubmitted(draft.id));
            }
        }

        let unit_code = normalize_unit(&draft.unit, &self.config.units);
        let (item_code, item_class_code, tax_bracket) = match existing {
            Some(prev) => (prev.item_code, prev.item_class_code, prev.tax_bracket),
            None => {
                let class_code = classify(&draft.category, &self.config.classes);
                let bracket = tax_bracket_for(&class_code, &self.config.classes);
                let code = next_item_code(&self.ledger, &self.config.item_prefix, &unit_code)?;
                (code, class_code, bracket)
            }
        };

        let mut item = CatalogItem {
            id: draft.id,
            name: draft.name,
            category: draft.category,
            unit: draft.unit,
            cost: draft.cost,
            item_code,
            item_class_code,
            tax_bracket,
            status: ItemStatus::Registered,
        };
        debug!(id = %item.id, code = %item.item_code, "registering catalog item");

        let request = build_item_request(&item, &unit_code, &self.config);
        match self.client.register_item(&request).await {
            Ok(response) if response.is_accepted() => {
                self.ledger.upsert_item(&item)?;
                Ok(item)
            }
            Ok(response) => {
                warn!(id = %item.id, code = %response.result_cd, "authority rejected item");
                item.status = ItemStatus::Errored {
                    reason: format!("[{}] {}", response.result_cd, response.result_msg),
                };
                self.ledger.upsert_item(&item)?;
                Err(FiscalError::Rejected {
                    code: response.result_cd,
                    message: response.result_msg,
                })
            }
            Err(FiscalError::Transport(message)) => {
                item.status = ItemStatus::Errored {
                    reason: format!("transport: {message}"),
                };
                self.ledger.upsert_item(&item)?;
                Err(FiscalError::Transport(message))
            }
            Err(other) => Err(other),
        }
    }

    /// Submit a sale, producing the persisted record and its receipt.
    ///
    /// A draft without an invoice number gets one allocated; a draft rebuilt
    /// from an errored record resubmits its existing number.
    pub async fn submit_sale(&self, draft: SaleDraft) -> Result<SaleOutcome, FiscalError> {
        let errors = validate_sale_draft(&draft);
        if !errors.is_empty() {
            return Err(validation_failure(errors));
        }
        if self.ledger.has_succeeded(&draft.reference)? {
            return Err(FiscalError::AlreadySubmitted(draft.reference));
        }

        let invoice_number = match draft.invoice_number {
            Some(n) => n,
            None => self.ledger.allocate_invoice_number()?,
        };
        let discount = resolve_discount(&draft);
        let breakdown = compute_breakdown(&draft.lines, discount, &self.config.rates)?;

        let mut sale = Sale {
            reference: draft.reference,
            invoice_number,
            origin_invoice_number: draft.origin_invoice_number,
            lines: draft.lines,
            discount,
            discount_kind: draft.discount_kind,
            payment: draft.payment,
            customer: draft.customer,
            breakdown,
            submission: SubmissionRecord::pending(),
        };
        sale.submission.attempts = 1;
        debug!(reference = %sale.reference, invoice = invoice_number, "submitting sale");

        let request = build_invoice_request(&sale, &self.config);
        let outcome = self.client.submit_invoice(&request).await;
        let sale = self.conclude(sale, outcome)?;

        let receipt = receipt::render(&sale, &self.config)?;
        Ok(SaleOutcome { sale, receipt })
    }

    /// Resubmit every errored sale, replaying the stored payloads.
    ///
    /// Amounts and allocated numbers come from the persisted records —
    /// nothing is recomputed, so the tax snapshot cannot drift between
    /// attempts. Individual failures are counted, not propagated; ledger
    /// failures and the acknowledged-but-unpersisted case abort the pass.
    pub async fn retry_failed(&self) -> Result<RetryReport, FiscalError> {
        let failed = self.ledger.failed_sales()?;
        let mut report = RetryReport::default();

        for mut sale in failed {
            report.retried += 1;
            sale.submission.attempts += 1;
            debug!(reference = %sale.reference, attempt = sale.submission.attempts, "retrying sale");

            let request = build_invoice_request(&sale, &self.config);
            let outcome = self.client.submit_invoice(&request).await;
            match self.conclude(sale, outcome) {
                Ok(_) => report.succeeded += 1,
                Err(e @ FiscalError::AcknowledgedNotPersisted { .. }) => return Err(e),
                Err(FiscalError::Ledger(e)) => return Err(FiscalError::Ledger(e)),
                Err(_) => report.failed += 1,
            }
        }

        Ok(report)
    }

    /// Interpret the Authority's verdict and drive the record to a persisted
    /// terminal state. The ledger write happens only here, after the remote
    /// call has returned.
    fn conclude(
        &self,
        mut sale: Sale,
        outcome: Result<AuthorityResponse, FiscalError>,
    ) -> Result<Sale, FiscalError> {
        match outcome {
            Ok(response) if response.is_accepted() => match response.acknowledgement() {
                Ok(ack) => {
                    sale.submission.status = SubmissionStatus::Success(ack.clone());
                    if let Err(persist_error) = self.ledger.record_sale(&sale) {
                        return Err(FiscalError::AcknowledgedNotPersisted {
                            ack: Box::new(ack),
                            persist_error: persist_error.to_string(),
                        });
                    }
                    // Best-effort secondary side effect: log and continue.
                    if let Err(e) = self.ledger.adjust_stock(&sale) {
                        warn!(reference = %sale.reference, error = %e, "stock adjustment failed");
                    }
                    Ok(sale)
                }
                Err(e) => {
                    sale.submission.status = SubmissionStatus::Error {
                        reason: format!("malformed acknowledgement: {e}"),
                    };
                    self.ledger.record_sale(&sale)?;
                    Err(e)
                }
            },
            Ok(response) => {
                warn!(
                    reference = %sale.reference,
                    code = %response.result_cd,
                    "authority rejected sale"
                );
                sale.submission.status = SubmissionStatus::Error {
                    reason: format!("[{}] {}", response.result_cd, response.result_msg),
                };
                self.ledger.record_sale(&sale)?;
                Err(FiscalError::Rejected {
                    code: response.result_cd,
                    message: response.result_msg,
                })
            }
            Err(FiscalError::Transport(message)) => {
                sale.submission.status = SubmissionStatus::Error {
                    reason: format!("transport: {message}"),
                };
                self.ledger.record_sale(&sale)?;
                Err(FiscalError::Transport(message))
            }
            Err(other) => Err(other),
        }
    }
}

/// Resolve the draft's discount to an absolute amount. Percentage discounts
/// apply to the pre-discount order total.
fn resolve_discount(draft: &SaleDraft) -> Decimal {
    match draft.discount_kind {
        DiscountKind::Amount => draft.discount,
        DiscountKind::Percent => {
            let total: Decimal = draft
                .lines
                .iter()
                .map(|l| l.quantity * l.unit_price)
                .sum();
            round_half_up(total * draft.discount / dec!(100), 2)
        }
    }
}
