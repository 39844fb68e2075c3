//! Five-bracket tax computation with proportional order-discount allocation.
//!
//! The order-level discount is spread across lines in proportion to each
//! line's original amount, lines accumulate into their bracket's taxable and
//! tax sums, and each bracket total is rounded **once at aggregation** —
//! rounding per line would compound across large orders.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::config::RateTable;
use super::error::FiscalError;
use super::types::{LineBreakdown, SaleLine, TaxBracket, TaxBreakdown};

/// Round to `dp` decimal places using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the per-bracket breakdown for a set of lines and an order-level
/// discount.
///
/// A line without a bracket is treated as bracket B. The companion per-line
/// rows match the bracket aggregates to the cent.
pub fn compute_breakdown(
    lines: &[SaleLine],
    order_discount: Decimal,
    rates: &RateTable,
) -> Result<TaxBreakdown, FiscalError> {
    if order_discount.is_sign_negative() {
        return Err(FiscalError::Validation(
            "order discount must not be negative".into(),
        ));
    }

    let originals: Vec<Decimal> = lines
        .iter()
        .map(|line| line.quantity * line.unit_price)
        .collect();
    let total_original: Decimal = originals.iter().copied().sum();

    if order_discount > total_original {
        return Err(FiscalError::Validation(format!(
            "order discount {order_discount} exceeds order total {total_original}"
        )));
    }

    let mut taxable = [Decimal::ZERO; 5];
    let mut tax = [Decimal::ZERO; 5];
    let mut line_rows = Vec::with_capacity(lines.len());

    for (line, original) in lines.iter().zip(&originals) {
        let bracket = line.bracket.unwrap_or(TaxBracket::Standard);
        let rate = rates.rate(bracket);

        // Proportional allocation; a zero-amount order (or line) takes no
        // discount. Decimal division by zero panics rather than producing a
        // NaN, so the guard is explicit.
        let allocated = if total_original.is_zero() {
            Decimal::ZERO
        } else {
            order_discount * original / total_original
        };
        let discounted = original - allocated;
        let line_tax = discounted * rate / dec!(100);

        taxable[bracket.index()] += discounted;
        tax[bracket.index()] += line_tax;

        let discount_rate = if original.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(allocated / original * dec!(100), 2)
        };
        let row_taxable = round_half_up(discounted, 2);
        let row_tax = round_half_up(line_tax, 2);
        line_rows.push(LineBreakdown {
            bracket,
            original_amount: round_half_up(*original, 2),
            discount_rate,
            discount_amount: round_half_up(allocated, 2),
            taxable_amount: row_taxable,
            tax_amount: row_tax,
            line_total: row_taxable + row_tax,
        });
    }

    // One rounding per bracket total, after aggregation.
    for slot in taxable.iter_mut().chain(tax.iter_mut()) {
        *slot = round_half_up(*slot, 2);
    }

    let total_taxable: Decimal = taxable.iter().copied().sum();
    let total_tax: Decimal = tax.iter().copied().sum();

    Ok(TaxBreakdown {
        taxable,
        tax,
        total_amount: round_half_up(total_original, 2),
        total_taxable,
        total_tax,
        grand_total: total_taxable + total_tax,
        lines: line_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, qty: Decimal, bracket: Option<TaxBracket>) -> SaleLine {
        SaleLine {
            name: "item".into(),
            item_code: None,
            item_class_code: None,
            quantity: qty,
            unit_price: price,
            bracket,
        }
    }

    #[test]
    fn worked_scenario_with_order_discount() {
        // Item A: 100 × 2, bracket B. Item B: 50 × 1, bracket A. Discount 30.
        let lines = vec![
            line(dec!(100), dec!(2), Some(TaxBracket::Standard)),
            line(dec!(50), dec!(1), Some(TaxBracket::Exempt)),
        ];
        let b = compute_breakdown(&lines, dec!(30), &RateTable::default()).unwrap();

        assert_eq!(b.lines[0].original_amount, dec!(200));
        assert_eq!(b.lines[1].original_amount, dec!(50));
        assert_eq!(b.total_amount, dec!(250));
        assert_eq!(b.lines[0].discount_amount, dec!(24));
        assert_eq!(b.lines[1].discount_amount, dec!(6));
        assert_eq!(b.lines[0].taxable_amount, dec!(176));
        assert_eq!(b.lines[1].taxable_amount, dec!(44));
        assert_eq!(b.tax[TaxBracket::Standard.index()], dec!(28.16));
        assert_eq!(b.total_tax, dec!(28.16));
        assert_eq!(b.total_taxable, dec!(220));
        assert_eq!(b.grand_total, dec!(248.16));
    }

    #[test]
    fn missing_bracket_defaults_to_standard() {
        let lines = vec![line(dec!(100), dec!(1), None)];
        let b = compute_breakdown(&lines, Decimal::ZERO, &RateTable::default()).unwrap();
        assert_eq!(b.taxable[TaxBracket::Standard.index()], dec!(100));
        assert_eq!(b.tax[TaxBracket::Standard.index()], dec!(16));
    }

    #[test]
    fn zero_amount_order_takes_no_discount() {
        let lines = vec![line(dec!(0), dec!(1), Some(TaxBracket::Standard))];
        let b = compute_breakdown(&lines, Decimal::ZERO, &RateTable::default()).unwrap();
        assert_eq!(b.lines[0].discount_amount, Decimal::ZERO);
        assert_eq!(b.lines[0].discount_rate, Decimal::ZERO);
        assert_eq!(b.grand_total, Decimal::ZERO);
    }

    #[test]
    fn aggregates_round_once_per_bracket() {
        // 0.03 × 16 % = 0.0048 per line; three lines aggregate to 0.0144,
        // which rounds to 0.01. Per-line rounding would have produced 0.00.
        let lines = vec![
            line(dec!(0.03), dec!(1), Some(TaxBracket::Standard)),
            line(dec!(0.03), dec!(1), Some(TaxBracket::Standard)),
            line(dec!(0.03), dec!(1), Some(TaxBracket::Standard)),
        ];
        let b = compute_breakdown(&lines, Decimal::ZERO, &RateTable::default()).unwrap();
        assert_eq!(b.tax[TaxBracket::Standard.index()], dec!(0.01));
    }

    #[test]
    fn reduced_bracket_uses_eight_percent() {
        let lines = vec![line(dec!(100), dec!(1), Some(TaxBracket::Reduced))];
        let b = compute_breakdown(&lines, Decimal::ZERO, &RateTable::default()).unwrap();
        assert_eq!(b.tax[TaxBracket::Reduced.index()], dec!(8));
        assert_eq!(b.grand_total, dec!(108));
    }

    #[test]
    fn negative_discount_rejected() {
        let lines = vec![line(dec!(100), dec!(1), None)];
        let result = compute_breakdown(&lines, dec!(-1), &RateTable::default());
        assert!(matches!(result, Err(FiscalError::Validation(_))));
    }

    #[test]
    fn discount_exceeding_total_rejected() {
        let lines = vec![line(dec!(10), dec!(1), None)];
        let result = compute_breakdown(&lines, dec!(11), &RateTable::default());
        assert!(matches!(result, Err(FiscalError::Validation(_))));
    }

    #[test]
    fn conservation_of_money_is_exact() {
        let lines = vec![
            line(dec!(33.33), dec!(3), Some(TaxBracket::Standard)),
            line(dec!(7.77), dec!(2), Some(TaxBracket::Exempt)),
            line(dec!(0.01), dec!(7), Some(TaxBracket::Reduced)),
        ];
        let discount = dec!(12.34);
        let b = compute_breakdown(&lines, discount, &RateTable::default()).unwrap();

        let allocated: Decimal = b.lines.iter().map(|l| l.discount_amount).sum();
        let taxable: Decimal = b.lines.iter().map(|l| l.taxable_amount).sum();
        let original: Decimal = b.lines.iter().map(|l| l.original_amount).sum();
        assert!((taxable + allocated - original).abs() <= dec!(0.02));
        assert!((b.total_taxable + discount - b.total_amount).abs() <= dec!(0.01));
    }
}
