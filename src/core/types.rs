use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the five statutory VAT treatment classes.
///
/// Rates are configuration ([`RateTable`](super::config::RateTable)), not
/// properties of the enum; the statutory defaults are A 0 %, B 16 %, C 0 %,
/// D 0 %, E 8 %. Unknown or missing bracket letters default to B at the
/// classification seams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxBracket {
    /// A — exempt.
    Exempt,
    /// B — standard rate.
    Standard,
    /// C — zero-rated.
    ZeroRated,
    /// D — non-taxable.
    NonTaxable,
    /// E — reduced rate.
    Reduced,
}

impl TaxBracket {
    /// All brackets in the Authority's fixed reporting order A,B,C,D,E.
    pub const ALL: [TaxBracket; 5] = [
        Self::Exempt,
        Self::Standard,
        Self::ZeroRated,
        Self::NonTaxable,
        Self::Reduced,
    ];

    /// Bracket letter as it appears on payloads and receipts.
    pub fn letter(self) -> char {
        match self {
            Self::Exempt => 'A',
            Self::Standard => 'B',
            Self::ZeroRated => 'C',
            Self::NonTaxable => 'D',
            Self::Reduced => 'E',
        }
    }

    /// Parse from a bracket letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::Exempt),
            'B' => Some(Self::Standard),
            'C' => Some(Self::ZeroRated),
            'D' => Some(Self::NonTaxable),
            'E' => Some(Self::Reduced),
            _ => None,
        }
    }

    /// Position in the fixed A..E reporting order, used to index the
    /// per-bracket arrays of a [`TaxBreakdown`].
    pub fn index(self) -> usize {
        match self {
            Self::Exempt => 0,
            Self::Standard => 1,
            Self::ZeroRated => 2,
            Self::NonTaxable => 3,
            Self::Reduced => 4,
        }
    }
}

/// Payment method codes fixed by the Authority's payload vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// 01 — cash.
    Cash,
    /// 02 — credit (on account).
    Credit,
    /// 05 — bank card.
    Card,
    /// 06 — mobile money.
    Mobile,
    /// 07 — other.
    Other,
}

impl PaymentMethod {
    /// Two-digit payload code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Cash => "01",
            Self::Credit => "02",
            Self::Card => "05",
            Self::Mobile => "06",
            Self::Other => "07",
        }
    }

    /// Parse from a two-digit payload code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Cash),
            "02" => Some(Self::Credit),
            "05" => Some(Self::Card),
            "06" => Some(Self::Mobile),
            "07" => Some(Self::Other),
            _ => None,
        }
    }

    /// Label printed on the receipt's payment line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Credit => "CREDIT",
            Self::Card => "CARD",
            Self::Mobile => "MOBILE MONEY",
            Self::Other => "OTHER",
        }
    }
}

/// A business product or ingredient with its three Authority-issued fields.
///
/// Created when first registered with the Authority; mutated only by the
/// registration flow; never deleted, only marked errored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Internal identifier (the registration business key).
    pub id: String,
    pub name: String,
    /// Free-text category as entered by the operator.
    pub category: String,
    /// Free-text unit of measure as entered by the operator.
    pub unit: String,
    pub cost: Decimal,
    /// `<country><type><packaging><unitCode><7-digit-sequence>`; the sequence
    /// digits are unique per unit-code namespace.
    pub item_code: String,
    /// 8–10 digit classification code derived from the category.
    pub item_class_code: String,
    /// Derived deterministically from the classification; consistent with
    /// `item_class_code`.
    pub tax_bracket: TaxBracket,
    pub status: ItemStatus,
}

/// Registration outcome of a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Registered,
    Errored { reason: String },
}

/// Unregistered catalog item, as handed over by the caller.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub cost: Decimal,
}

/// How an order-level discount is expressed.
///
/// Percentage discounts are resolved to an absolute amount before the
/// breakdown is computed; the stored record keeps both the resolved amount
/// and the original kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountKind {
    Amount,
    Percent,
}

/// Buyer identity carried on a sale when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub tax_id: Option<String>,
    pub name: Option<String>,
}

/// One line of a sale as handed over by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub name: String,
    /// Authority item code, when the line originates from a registered
    /// catalog item.
    pub item_code: Option<String>,
    pub item_class_code: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Inherited from the originating catalog item; missing defaults to
    /// bracket B when the breakdown is computed.
    pub bracket: Option<TaxBracket>,
}

/// A sale not yet submitted, or an errored sale being resubmitted.
///
/// `invoice_number` is `None` for a fresh sale; a draft rebuilt from an
/// errored record carries the already-allocated number so resubmission does
/// not burn a new one.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    /// Caller's business key for this transaction (e.g. the order id).
    pub reference: String,
    pub invoice_number: Option<u64>,
    /// 0 for a new sale, the original invoice number for a reversal.
    pub origin_invoice_number: u64,
    pub lines: Vec<SaleLine>,
    /// Order-level discount value, read per `discount_kind`.
    pub discount: Decimal,
    pub discount_kind: DiscountKind,
    pub payment: PaymentMethod,
    pub customer: Option<Customer>,
}

/// Per-line companion of a [`TaxBreakdown`], included in the submitted
/// payload and on the receipt. Matches the bracket aggregates to the cent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub bracket: TaxBracket,
    /// `unit_price × quantity` before any discount.
    pub original_amount: Decimal,
    /// Allocated share of the order discount, as a percentage of the
    /// original amount. 0 for a zero-amount line.
    pub discount_rate: Decimal,
    pub discount_amount: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
    /// `taxable_amount + tax_amount`.
    pub line_total: Decimal,
}

/// Five-bracket taxable/tax aggregates plus the per-line companion rows.
///
/// The arrays are indexed by [`TaxBracket::index`] in the fixed A..E order.
/// Bracket totals are rounded once at aggregation, not per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub taxable: [Decimal; 5],
    pub tax: [Decimal; 5],
    /// Sum of original line amounts before discount.
    pub total_amount: Decimal,
    /// Σ taxable[*] — the order total after discount, before tax.
    pub total_taxable: Decimal,
    /// Σ tax[*].
    pub total_tax: Decimal,
    /// `total_taxable + total_tax`.
    pub grand_total: Decimal,
    pub lines: Vec<LineBreakdown>,
}

/// The Authority's opaque acknowledgement of a successful submission.
/// Immutable once stored; reproduced verbatim on receipts and in the
/// verification QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub receipt_counter: u64,
    pub total_receipt_counter: u64,
    /// Opaque internal signature blob.
    pub internal_data: String,
    /// Cryptographic signature string.
    pub signature: String,
    /// Confirmation timestamp as the Authority's 14-digit
    /// `YYYYMMDDHHMMSS` token.
    pub confirmed_at: String,
}

/// Persisted outcome of sending one transaction to the Authority.
///
/// Only the submission state machine transitions `Pending → Success | Error`;
/// `Success` is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Success(Acknowledgement),
    Error { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub status: SubmissionStatus,
    /// Submission attempts made so far, retries included.
    pub attempts: u32,
}

impl SubmissionRecord {
    pub fn pending() -> Self {
        Self {
            status: SubmissionStatus::Pending,
            attempts: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SubmissionStatus::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, SubmissionStatus::Error { .. })
    }

    /// The acknowledgement, when this record reached `Success`.
    pub fn acknowledgement(&self) -> Option<&Acknowledgement> {
        match &self.status {
            SubmissionStatus::Success(ack) => Some(ack),
            _ => None,
        }
    }
}

/// One commercial transaction with its computed amounts and submission
/// outcome. Allocated numbers are retained even when the submission errored,
/// so retries reuse them rather than re-allocating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub reference: String,
    pub invoice_number: u64,
    pub origin_invoice_number: u64,
    pub lines: Vec<SaleLine>,
    /// Resolved discount amount (percentage drafts are resolved before the
    /// breakdown is computed).
    pub discount: Decimal,
    pub discount_kind: DiscountKind,
    pub payment: PaymentMethod,
    pub customer: Option<Customer>,
    pub breakdown: TaxBreakdown,
    pub submission: SubmissionRecord,
}
