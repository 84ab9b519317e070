// Tests for the payment ledger arithmetic on an invoice.
//
// The ledger invariant is paid_amount <= total at all times, with
// balance == total - paid_amount. A payment that would overdraw the balance
// is rejected and must leave the invoice untouched. Status follows the
// payment state: fully covered invoices become paid, a first payment moves
// a draft to unpaid, and any other status is left as the user set it.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use facturio::modules::documents::models::{LineItem, LineItemRequest};
use facturio::modules::invoices::models::{CreateInvoiceRequest, Invoice, InvoiceStatus};

fn invoice_with_total(total: Decimal) -> Invoice {
    Invoice::new(
        "company-1",
        "INV-1000".to_string(),
        CreateInvoiceRequest {
            client_id: "client-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            status: InvoiceStatus::Draft,
            notes: None,
            line_items: vec![LineItemRequest {
                description: "Work".to_string(),
                quantity: Decimal::ONE,
                unit_price: total,
                tax_rate: Decimal::ZERO,
            }],
        },
    )
    .unwrap()
}

#[test]
fn test_partial_payments_accumulate() {
    let mut invoice = invoice_with_total(dec!(295));

    invoice.apply_payment(dec!(120)).unwrap();
    invoice.apply_payment(dec!(100)).unwrap();

    assert_eq!(invoice.paid_amount, dec!(220));
    assert_eq!(invoice.balance, dec!(75));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_overpayment_is_rejected_and_ledger_untouched() {
    let mut invoice = invoice_with_total(dec!(295));
    invoice.apply_payment(dec!(220)).unwrap();

    let result = invoice.apply_payment(dec!(80));
    assert!(result.is_err());

    assert_eq!(invoice.paid_amount, dec!(220));
    assert_eq!(invoice.balance, dec!(75));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_exact_final_payment_settles_the_invoice() {
    let mut invoice = invoice_with_total(dec!(295));
    invoice.apply_payment(dec!(220)).unwrap();
    invoice.apply_payment(dec!(75)).unwrap();

    assert_eq!(invoice.paid_amount, dec!(295));
    assert_eq!(invoice.balance, Decimal::ZERO);
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}

#[test]
fn test_single_full_payment_settles_the_invoice() {
    let mut invoice = invoice_with_total(dec!(100));
    invoice.apply_payment(dec!(100)).unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.balance, Decimal::ZERO);
}

#[test]
fn test_sent_invoice_stays_sent_after_partial_payment() {
    let mut invoice = invoice_with_total(dec!(100));
    invoice.status = InvoiceStatus::Sent;

    invoice.apply_payment(dec!(40)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Sent);
}

#[test]
fn test_shrinking_line_items_below_paid_amount_is_rejected() {
    let mut invoice = invoice_with_total(dec!(295));
    invoice.apply_payment(dec!(220)).unwrap();

    // Replacing the items with a set totalling 100 would leave
    // paid_amount 220 > total 100 and a negative balance
    let result = invoice.replace_line_items(vec![LineItem::new(
        "Reduced scope".to_string(),
        Decimal::ONE,
        dec!(100),
        Decimal::ZERO,
    )
    .unwrap()]);

    assert!(result.is_err());
    assert!(invoice.paid_amount <= invoice.total);
    assert_eq!(invoice.total, dec!(295));
    assert_eq!(invoice.balance, dec!(75));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_non_positive_payments_are_rejected() {
    let mut invoice = invoice_with_total(dec!(100));

    assert!(invoice.apply_payment(Decimal::ZERO).is_err());
    assert!(invoice.apply_payment(dec!(-5)).is_err());
    assert_eq!(invoice.paid_amount, Decimal::ZERO);
}

proptest! {
    #[test]
    fn test_paid_amount_never_exceeds_total(
        total_cents in 1u64..10_000_000u64,
        payment_cents in prop::collection::vec(1u64..10_000_000u64, 1..10)
    ) {
        let total = Decimal::new(total_cents as i64, 2);
        let mut invoice = invoice_with_total(total);

        for cents in payment_cents {
            // Rejected payments must not move the ledger
            let _ = invoice.apply_payment(Decimal::new(cents as i64, 2));

            prop_assert!(invoice.paid_amount <= invoice.total);
            prop_assert_eq!(invoice.balance, invoice.total - invoice.paid_amount);
            prop_assert!(invoice.balance >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_settled_exactly_when_balance_is_zero(
        total_cents in 1u64..1_000_000u64,
        first_cents in 1u64..1_000_000u64
    ) {
        let total = Decimal::new(total_cents as i64, 2);
        let mut invoice = invoice_with_total(total);

        let first = Decimal::new(first_cents as i64, 2);
        if invoice.apply_payment(first).is_ok() {
            prop_assert_eq!(
                invoice.status == InvoiceStatus::Paid,
                invoice.balance == Decimal::ZERO
            );
        }
    }
}
