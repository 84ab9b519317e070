// Property-based tests for document total derivation.
//
// Totals are derived, never stored independently of the line items: the
// subtotal is the sum of quantity x unit price, tax is accumulated per line
// at that line's rate, and the grand total is the rounded subtotal plus the
// rounded tax. Uses proptest to validate the arithmetic across many inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use facturio::modules::documents::models::LineItem;
use facturio::modules::documents::services::{compute_totals, line_tax, line_total};

fn item(quantity: Decimal, unit_price: Decimal, tax_rate: Decimal) -> LineItem {
    LineItem::new("Item".to_string(), quantity, unit_price, tax_rate).unwrap()
}

fn arb_item() -> impl Strategy<Value = LineItem> {
    (0u64..10_000u64, 0u64..1_000_000u64, 0u8..=100u8).prop_map(|(qty, cents, rate)| {
        item(
            Decimal::from(qty),
            Decimal::new(cents as i64, 2),
            Decimal::from(rate),
        )
    })
}

proptest! {
    #[test]
    fn test_total_is_subtotal_plus_tax(items in prop::collection::vec(arb_item(), 0..8)) {
        let totals = compute_totals(&items);

        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn test_totals_are_non_negative(items in prop::collection::vec(arb_item(), 0..8)) {
        let totals = compute_totals(&items);

        prop_assert!(totals.subtotal >= Decimal::ZERO);
        prop_assert!(totals.tax_amount >= Decimal::ZERO);
        prop_assert!(totals.total >= Decimal::ZERO);
    }

    #[test]
    fn test_totals_are_deterministic(items in prop::collection::vec(arb_item(), 0..8)) {
        let first = compute_totals(&items);
        let second = compute_totals(&items);

        prop_assert_eq!(first.subtotal, second.subtotal);
        prop_assert_eq!(first.tax_amount, second.tax_amount);
        prop_assert_eq!(first.total, second.total);
    }

    #[test]
    fn test_tax_never_exceeds_line_total(
        qty in 0u64..10_000u64,
        cents in 0u64..1_000_000u64,
        rate in 0u8..=100u8
    ) {
        let item = item(
            Decimal::from(qty),
            Decimal::new(cents as i64, 2),
            Decimal::from(rate),
        );

        prop_assert!(line_tax(&item) <= line_total(&item));
    }
}

#[test]
fn test_mixed_rate_document() {
    // Two items at different rates: 2 x 100 at 20% and 1 x 50 at 10%
    let items = vec![
        item(dec!(2), dec!(100), dec!(20)),
        item(dec!(1), dec!(50), dec!(10)),
    ];

    let totals = compute_totals(&items);

    assert_eq!(totals.subtotal, dec!(250));
    assert_eq!(totals.tax_amount, dec!(45));
    assert_eq!(totals.total, dec!(295));
}

#[test]
fn test_empty_document_has_zero_totals() {
    let totals = compute_totals(&[]);

    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.tax_amount, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::ZERO);
}

#[test]
fn test_fractional_quantities_round_half_even() {
    // 1.5 x 33.33 = 49.995, which rounds to 50.00 under banker's rounding
    let items = vec![item(dec!(1.5), dec!(33.33), dec!(0))];

    let totals = compute_totals(&items);

    assert_eq!(totals.subtotal, dec!(50.00));
    assert_eq!(totals.tax_amount, Decimal::ZERO);
    assert_eq!(totals.total, dec!(50.00));
}

#[test]
fn test_tax_accumulates_before_rounding() {
    // Each line's raw tax is 0.014; summed first (0.028) then rounded gives
    // 0.03, where rounding each line to 0.01 would have produced 0.02
    let items = vec![
        item(dec!(1), dec!(1.40), dec!(1)),
        item(dec!(1), dec!(1.40), dec!(1)),
    ];

    let totals = compute_totals(&items);

    assert_eq!(totals.tax_amount, dec!(0.03));
}
