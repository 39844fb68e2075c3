//! Fixed-layout receipt tests: section order, money formatting, the
//! verification QR, and the render/re-parse round trip.

use risiti::core::*;
use risiti::receipt::{self, format_money, parse_summary};
use rust_decimal_macros::dec;

fn successful_sale() -> Sale {
    let lines = vec![
        SaleLine {
            name: "Grilled Tilapia".into(),
            item_code: Some("KE2NTU0000001".into()),
            item_class_code: Some("5020230100".into()),
            quantity: dec!(2),
            unit_price: dec!(1200),
            bracket: Some(TaxBracket::Standard),
        },
        SaleLine {
            name: "Market Greens".into(),
            item_code: None,
            item_class_code: None,
            quantity: dec!(1),
            unit_price: dec!(50),
            bracket: Some(TaxBracket::Exempt),
        },
    ];
    let breakdown = compute_breakdown(&lines, dec!(30), &RateTable::default()).unwrap();
    Sale {
        reference: "ORD-1001".into(),
        invoice_number: 42,
        origin_invoice_number: 0,
        lines,
        discount: dec!(30),
        discount_kind: DiscountKind::Amount,
        payment: PaymentMethod::Cash,
        customer: Some(Customer {
            tax_id: Some("A012345678Z".into()),
            name: None,
        }),
        breakdown,
        submission: SubmissionRecord {
            status: SubmissionStatus::Success(Acknowledgement {
                receipt_counter: 312,
                total_receipt_counter: 502,
                internal_data: "ABCD1234EFGH5678IJKL".into(),
                signature: "SIGXYZ0001SIGXYZ0001".into(),
                confirmed_at: "20240615143059".into(),
            }),
            attempts: 1,
        },
    }
}

fn config() -> FiscalConfig {
    FiscalConfig::builder("P051234567X", "00", "SCU-0042")
        .business_name("Mama Oliech Restaurant")
        .address("Marcus Garvey Rd, Nairobi")
        .receipt_footer("THANK YOU — WELCOME AGAIN")
        .build()
}

#[test]
fn sections_appear_in_the_mandated_order() {
    let rendered = receipt::render(&successful_sale(), &config()).unwrap();
    let text = &rendered.text;

    let markers = [
        "Mama Oliech Restaurant",
        "TAX INVOICE",
        "Buyer PIN: A012345678Z",
        "Grilled Tilapia",
        "Market Greens",
        "Order discount",
        "SUBTOTAL BEFORE DISCOUNT",
        "DISCOUNT",
        "SUBTOTAL",
        "TAX TOTAL",
        "TOTAL",
        "PAID VIA",
        "ITEMS: 2",
        "RATE",
        "DEVICE",
        "RECEIPT/INVOICE",
        "INTERNAL DATA:",
        "SIGNATURE:",
        "RECEIPT NO",
        "DATE: 15/06/2024",
        "SCAN TO VERIFY",
        "THANK YOU — WELCOME AGAIN",
    ];
    let mut last = 0;
    for marker in markers {
        let at = text[last..]
            .find(marker)
            .unwrap_or_else(|| panic!("'{marker}' missing or out of order"));
        last += at + marker.len();
    }
}

#[test]
fn bracket_table_has_all_five_rows_in_order() {
    let rendered = receipt::render(&successful_sale(), &config()).unwrap();
    let rows: Vec<&str> = rendered
        .text
        .lines()
        .filter(|l| {
            TaxBracket::ALL
                .iter()
                .any(|b| l.starts_with(&format!("{} ", b.letter())))
        })
        .collect();
    assert_eq!(rows.len(), 5);
    let letters: Vec<char> = rows.iter().filter_map(|r| r.chars().next()).collect();
    assert_eq!(letters, vec!['A', 'B', 'C', 'D', 'E']);
    assert!(rows[1].contains("16.00%"));
    assert!(rows[4].contains("8.00%"));
}

#[test]
fn currency_values_carry_separators_and_two_decimals() {
    let rendered = receipt::render(&successful_sale(), &config()).unwrap();
    // 2400 + 50 = 2450 before discount; 2420 after; tax 379.30.
    assert!(rendered.text.contains("2,450.00"));
    assert!(rendered.text.contains("2,420.00"));
    assert!(rendered.text.contains("379.30"));
    assert!(rendered.text.contains("2,799.30"));
    assert!(rendered.text.contains("-30.00"));
}

#[test]
fn timestamp_is_split_without_a_date_parser() {
    let rendered = receipt::render(&successful_sale(), &config()).unwrap();
    assert!(rendered.text.contains("DATE: 15/06/2024"));
    assert!(rendered.text.contains("TIME: 14:30:59"));
}

#[test]
fn qr_payload_and_escpos_embed_the_same_verification_code() {
    let rendered = receipt::render(&successful_sale(), &config()).unwrap();
    assert_eq!(
        rendered.qr_payload,
        "P051234567X+312+SIGXYZ0001SIGXYZ0001"
    );
    // The ESC/POS stream stores the payload through the QR command set.
    let payload = rendered.qr_payload.as_bytes();
    assert!(
        rendered
            .escpos
            .windows(payload.len())
            .any(|w| w == payload)
    );
    // QR store-data function header: GS ( k ... 1 P 0
    assert!(rendered.escpos.windows(3).any(|w| w == [0x31, 0x50, 0x30]));
}

#[test]
fn rendering_round_trips_through_the_parser() {
    let sale = successful_sale();
    let rendered = receipt::render(&sale, &config()).unwrap();
    let summary = parse_summary(&rendered.text).unwrap();

    assert_eq!(summary.invoice_number, sale.invoice_number);
    assert_eq!(summary.item_count, sale.lines.len());
    assert_eq!(summary.grand_total, sale.breakdown.grand_total);
}

#[test]
fn discount_lines_are_omitted_on_undiscounted_sales() {
    let lines = vec![SaleLine {
        name: "Chai".into(),
        item_code: None,
        item_class_code: None,
        quantity: dec!(1),
        unit_price: dec!(50),
        bracket: Some(TaxBracket::Standard),
    }];
    let breakdown = compute_breakdown(&lines, dec!(0), &RateTable::default()).unwrap();
    let mut sale = successful_sale();
    sale.lines = lines;
    sale.discount = dec!(0);
    sale.breakdown = breakdown;
    sale.customer = None;

    let rendered = receipt::render(&sale, &config()).unwrap();
    assert!(!rendered.text.lines().any(|l| l.starts_with("DISCOUNT")));
    assert!(!rendered.text.contains("Order discount"));
    assert!(!rendered.text.contains("Buyer PIN"));
}

#[test]
fn pending_and_errored_sales_cannot_render() {
    let mut sale = successful_sale();
    sale.submission.status = SubmissionStatus::Error {
        reason: "[001] rejected".into(),
    };
    assert!(matches!(
        receipt::render(&sale, &config()),
        Err(FiscalError::Render(_))
    ));

    sale.submission.status = SubmissionStatus::Pending;
    assert!(matches!(
        receipt::render(&sale, &config()),
        Err(FiscalError::Render(_))
    ));
}

#[test]
fn money_formatting_matches_local_convention() {
    assert_eq!(format_money(dec!(1234567.5)), "1,234,567.50");
    assert_eq!(format_money(dec!(248.155)), "248.16");
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::*;
    use risiti::receipt::pdf::render_pdf;

    #[test]
    fn pdf_rendition_is_loadable_and_paginated() {
        let rendered = receipt::render(&successful_sale(), &config()).unwrap();
        let bytes = render_pdf(&rendered).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(!doc.get_pages().is_empty());
    }
}
