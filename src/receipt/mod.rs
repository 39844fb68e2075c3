//! Receipt rendering in the Authority's mandated layout.
//!
//! A successful submission renders to three artefacts at once: a plain-text
//! ticket in the fixed section order, an ESC/POS byte stream for thermal
//! printers with the verification QR embedded via the printer's native QR
//! command set, and the raw QR payload
//! (`businessTaxId + "+" + receiptCounter + "+" + signature`) for callers
//! that draw their own code. The `pdf` feature adds a paginated PDF of the
//! same layout.
//!
//! # Example
//!
//! ```no_run
//! use risiti::core::{FiscalConfig, Sale};
//! use risiti::receipt;
//!
//! let config: FiscalConfig = todo!();
//! let sale: Sale = todo!(); // with a successful submission record
//! let rendered = receipt::render(&sale, &config).unwrap();
//! println!("{}", rendered.text);
//! ```

mod escpos;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use escpos::TicketBuilder;

use rust_decimal::Decimal;

use crate::core::tax::round_half_up;
use crate::core::{
    Acknowledgement, CompactTimestamp, FiscalConfig, FiscalError, Sale, TaxBracket,
};

/// Character width of the printed ticket (80 mm paper).
pub const RECEIPT_WIDTH: usize = 42;

/// A rendered receipt.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Fixed-layout plain text.
    pub text: String,
    /// ESC/POS byte stream with the embedded scannable QR.
    pub escpos: Vec<u8>,
    /// Verification QR payload.
    pub qr_payload: String,
}

/// Totals recovered from a rendered ticket, for verification against the
/// source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub invoice_number: u64,
    pub item_count: usize,
    pub grand_total: Decimal,
}

/// The verification QR payload: `taxId+receiptCounter+signature`.
pub fn qr_payload(tax_id: &str, ack: &Acknowledgement) -> String {
    format!("{}+{}+{}", tax_id, ack.receipt_counter, ack.signature)
}

/// Format a currency value with exactly two decimals and thousands
/// separators.
pub fn format_money(value: Decimal) -> String {
    let rounded = round_half_up(value, 2);
    let plain = format!("{rounded:.2}");
    let (sign, rest) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = rest.split_once('.').unwrap_or((rest, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// Render the mandated receipt for a successfully submitted sale.
///
/// Fails with [`FiscalError::Render`] when the sale has no acknowledgement.
pub fn render(sale: &Sale, config: &FiscalConfig) -> Result<Receipt, FiscalError> {
    let ack = sale.submission.acknowledgement().ok_or_else(|| {
        FiscalError::Render("receipt requires a successfully submitted sale".into())
    })?;
    let confirmed = CompactTimestamp::parse(&ack.confirmed_at)?;
    let payload = qr_payload(&config.tax_id, ack);
    let b = &sale.breakdown;

    let mut text = String::new();
    let mut ticket = TicketBuilder::new(RECEIPT_WIDTH);

    // Header: business identity.
    put_centered(&mut text, &mut ticket, &config.business_name);
    put_centered(&mut text, &mut ticket, &config.address);
    put_centered(&mut text, &mut ticket, &format!("PIN: {}", config.tax_id));
    put_separator(&mut text, &mut ticket);

    // Tax-invoice banner.
    ticket.bold(true);
    put_centered(&mut text, &mut ticket, "TAX INVOICE");
    ticket.bold(false);
    put_separator(&mut text, &mut ticket);

    // Buyer tax id, only when present.
    if let Some(buyer_pin) = sale.customer.as_ref().and_then(|c| c.tax_id.as_deref()) {
        put(&mut text, &mut ticket, &format!("Buyer PIN: {buyer_pin}"));
        put_separator(&mut text, &mut ticket);
    }

    // Line items: name, then `qty x unitPrice = total` with the bracket
    // letter. The shown total is the pre-discount line amount.
    for (line, row) in sale.lines.iter().zip(&b.lines) {
        put(&mut text, &mut ticket, &line.name);
        put(
            &mut text,
            &mut ticket,
            &format!(
                "  {} x {} = {} {}",
                line.quantity,
                format_money(line.unit_price),
                format_money(row.original_amount),
                row.bracket.letter()
            ),
        );
    }
    put_separator(&mut text, &mut ticket);

    // Discount narration ahead of the figures.
    if sale.discount > Decimal::ZERO {
        put(
            &mut text,
            &mut ticket,
            &format!(
                "Order discount {} allocated across {} item(s)",
                format_money(sale.discount),
                sale.lines.len()
            ),
        );
    }
    put_pair(
        &mut text,
        &mut ticket,
        "SUBTOTAL BEFORE DISCOUNT",
        &format_money(b.total_amount),
    );
    if sale.discount > Decimal::ZERO {
        put_pair(
            &mut text,
            &mut ticket,
            "DISCOUNT",
            &format!("-{}", format_money(sale.discount)),
        );
    }
    put_pair(&mut text, &mut ticket, "SUBTOTAL", &format_money(b.total_taxable));
    put_pair(&mut text, &mut ticket, "TAX TOTAL", &format_money(b.total_tax));
    ticket.bold(true);
    put_pair(&mut text, &mut ticket, "TOTAL", &format_money(b.grand_total));
    ticket.bold(false);
    put_pair(&mut text, &mut ticket, "PAID VIA", sale.payment.label());
    put(&mut text, &mut ticket, &format!("ITEMS: {}", sale.lines.len()));
    put_separator(&mut text, &mut ticket);

    // Five-row bracket summary, fixed order A..E.
    put(
        &mut text,
        &mut ticket,
        &format!("{:<8} {:>18} {:>14}", "RATE", "TAXABLE", "TAX"),
    );
    for bracket in TaxBracket::ALL {
        let rate = config.rates.rate(bracket);
        put(
            &mut text,
            &mut ticket,
            &format!(
                "{} {:>6} {:>18} {:>14}",
                bracket.letter(),
                format!("{rate:.2}%"),
                format_money(b.taxable[bracket.index()]),
                format_money(b.tax[bracket.index()]),
            ),
        );
    }
    put_separator(&mut text, &mut ticket);

    // Device information block.
    put_pair(&mut text, &mut ticket, "DEVICE", &config.device_id);
    put_pair(
        &mut text,
        &mut ticket,
        "RECEIPT/INVOICE",
        &format!("{}/{}", ack.receipt_counter, sale.invoice_number),
    );
    put(&mut text, &mut ticket, "INTERNAL DATA:");
    for chunk in wrap(&ack.internal_data, RECEIPT_WIDTH) {
        put(&mut text, &mut ticket, &chunk);
    }
    put(&mut text, &mut ticket, "SIGNATURE:");
    for chunk in wrap(&ack.signature, RECEIPT_WIDTH) {
        put(&mut text, &mut ticket, &chunk);
    }
    put_separator(&mut text, &mut ticket);

    // Receipt-number block with the split date/time.
    put_pair(
        &mut text,
        &mut ticket,
        "RECEIPT NO",
        &ack.total_receipt_counter.to_string(),
    );
    put_pair(
        &mut text,
        &mut ticket,
        &format!("DATE: {}", confirmed.display_date()),
        &format!("TIME: {}", confirmed.display_time()),
    );
    put_separator(&mut text, &mut ticket);

    // Verification code: scannable on paper, in clear in the text rendition.
    put_centered(&mut text, &mut ticket, "SCAN TO VERIFY");
    ticket.center().qr_code(&payload, 6).left();
    for chunk in wrap(&payload, RECEIPT_WIDTH) {
        put(&mut text, &mut ticket, &chunk);
    }

    // Closing message.
    put_centered(&mut text, &mut ticket, &config.receipt_footer);
    ticket.cut(4);

    Ok(Receipt {
        text,
        escpos: ticket.into_bytes(),
        qr_payload: payload,
    })
}

/// Recover the grand total, item count, and invoice number from a rendered
/// ticket. `None` when any of the three sections is missing or malformed.
pub fn parse_summary(text: &str) -> Option<ReceiptSummary> {
    let mut invoice_number = None;
    let mut item_count = None;
    let mut grand_total = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("TOTAL ") {
            grand_total = parse_money(rest.trim());
        } else if let Some(rest) = line.strip_prefix("ITEMS:") {
            item_count = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("RECEIPT/INVOICE") {
            invoice_number = rest
                .trim()
                .split('/')
                .nth(1)
                .and_then(|n| n.parse().ok());
        }
    }

    Some(ReceiptSummary {
        invoice_number: invoice_number?,
        item_count: item_count?,
        grand_total: grand_total?,
    })
}

fn parse_money(s: &str) -> Option<Decimal> {
    s.replace(',', "").parse().ok()
}

fn put(text: &mut String, ticket: &mut TicketBuilder, line: &str) {
    text.push_str(line);
    text.push('\n');
    ticket.line(line);
}

fn put_centered(text: &mut String, ticket: &mut TicketBuilder, line: &str) {
    let len = line.chars().count();
    let pad = RECEIPT_WIDTH.saturating_sub(len) / 2;
    text.push_str(&" ".repeat(pad));
    text.push_str(line);
    text.push('\n');
    ticket.center().line(line).left();
}

fn put_pair(text: &mut String, ticket: &mut TicketBuilder, left: &str, right: &str) {
    let used = left.chars().count() + right.chars().count();
    if used >= RECEIPT_WIDTH {
        put(text, ticket, &format!("{left} {right}"));
    } else {
        text.push_str(left);
        text.push_str(&" ".repeat(RECEIPT_WIDTH - used));
        text.push_str(right);
        text.push('\n');
        ticket.line_pair(left, right);
    }
}

fn put_separator(text: &mut String, ticket: &mut TicketBuilder) {
    let rule = "-".repeat(RECEIPT_WIDTH);
    text.push_str(&rule);
    text.push('\n');
    ticket.separator();
}

fn wrap(s: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(9.5)), "9.50");
        assert_eq!(format_money(dec!(1234.5)), "1,234.50");
        assert_eq!(format_money(dec!(2448.16)), "2,448.16");
        assert_eq!(format_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_money(dec!(-30)), "-30.00");
    }

    #[test]
    fn qr_payload_concatenation() {
        let ack = Acknowledgement {
            receipt_counter: 312,
            total_receipt_counter: 502,
            internal_data: "INT".into(),
            signature: "SIGXYZ".into(),
            confirmed_at: "20240615143059".into(),
        };
        assert_eq!(qr_payload("P051234567X", &ack), "P051234567X+312+SIGXYZ");
    }

    #[test]
    fn wrap_splits_long_blobs() {
        let wrapped = wrap("ABCDEFGHIJ", 4);
        assert_eq!(wrapped, vec!["ABCD", "EFGH", "IJ"]);
        assert_eq!(wrap("", 4), vec![String::new()]);
    }

    #[test]
    fn parse_summary_requires_all_sections() {
        assert!(parse_summary("no receipt here").is_none());
    }
}
