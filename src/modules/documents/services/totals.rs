// Monetary engine: pure functions deriving document totals from line items.
//
// Totals are recomputed from scratch whenever a document's line items change;
// the stored subtotal/tax_amount/total columns are always derived, never
// user-supplied.

use rust_decimal::Decimal;

use crate::core::money::round_amount;
use crate::modules::documents::models::LineItem;

/// Derived totals for a quote or invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl DocumentTotals {
    pub const ZERO: DocumentTotals = DocumentTotals {
        subtotal: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Per-item total before tax: quantity × unit price
pub fn line_total(item: &LineItem) -> Decimal {
    item.quantity * item.unit_price
}

/// Per-item total including tax, rounded for display
pub fn line_total_with_tax(item: &LineItem) -> Decimal {
    let factor = Decimal::ONE + item.tax_rate / Decimal::from(100);
    round_amount(line_total(item) * factor)
}

/// Per-item tax amount: quantity × unit price × tax rate / 100
pub fn line_tax(item: &LineItem) -> Decimal {
    line_total(item) * item.tax_rate / Decimal::from(100)
}

/// Compute subtotal, tax amount, and grand total for a set of line items.
///
/// Subtotal and tax are accumulated at full precision, then rounded to the
/// monetary scale; the grand total is the sum of the two rounded values so
/// that `total == subtotal + tax_amount` holds exactly on persisted rows.
/// An empty list yields all zeros.
pub fn compute_totals(items: &[LineItem]) -> DocumentTotals {
    let raw_subtotal: Decimal = items.iter().map(line_total).sum();
    let raw_tax: Decimal = items.iter().map(line_tax).sum();

    let subtotal = round_amount(raw_subtotal);
    let tax_amount = round_amount(raw_tax);

    DocumentTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price: i64, tax_rate: i64) -> LineItem {
        LineItem::new(
            "Item".to_string(),
            Decimal::from(quantity),
            Decimal::from(unit_price),
            Decimal::from(tax_rate),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_line_items_yield_zero_totals() {
        assert_eq!(compute_totals(&[]), DocumentTotals::ZERO);
    }

    #[test]
    fn test_compute_totals() {
        // 2 × 100 @ 20% + 1 × 50 @ 10% => subtotal 250, tax 45, total 295
        let items = vec![item(2, 100, 20), item(1, 50, 10)];

        let totals = compute_totals(&items);
        assert_eq!(totals.subtotal, Decimal::from(250));
        assert_eq!(totals.tax_amount, Decimal::from(45));
        assert_eq!(totals.total, Decimal::from(295));
    }

    #[test]
    fn test_line_total_with_tax() {
        let item = item(2, 100, 20);
        assert_eq!(line_total(&item), Decimal::from(200));
        assert_eq!(line_total_with_tax(&item), Decimal::from(240));
    }

    #[test]
    fn test_totals_are_deterministic() {
        let items = vec![item(3, 33, 19), item(7, 12, 5)];

        assert_eq!(compute_totals(&items), compute_totals(&items));
    }
}
