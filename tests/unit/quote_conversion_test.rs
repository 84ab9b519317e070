// Tests for deriving an invoice from a quote.
//
// Conversion copies the client, line items, totals, and notes; the new
// invoice starts as a draft with a zero payment state and the full total
// outstanding. The due date falls a configured number of days after the
// quote date, and the invoice keeps a provenance link back to the quote.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use facturio::modules::documents::models::LineItemRequest;
use facturio::modules::invoices::models::{Invoice, InvoiceStatus};
use facturio::modules::quotes::models::{CreateQuoteRequest, Quote, QuoteStatus};

fn quote() -> Quote {
    Quote::new(
        "company-1",
        "Q-0001".to_string(),
        CreateQuoteRequest {
            client_id: "client-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            status: QuoteStatus::Sent,
            notes: Some("Net 30".to_string()),
            line_items: vec![
                LineItemRequest {
                    description: "Design".to_string(),
                    quantity: Decimal::from(2),
                    unit_price: Decimal::from(200),
                    tax_rate: dec!(25),
                },
                LineItemRequest {
                    description: "Hosting".to_string(),
                    quantity: Decimal::ONE,
                    unit_price: Decimal::ZERO,
                    tax_rate: Decimal::ZERO,
                },
            ],
        },
    )
    .unwrap()
}

#[test]
fn test_converted_invoice_starts_as_unpaid_draft() {
    let quote = quote();
    let invoice = Invoice::from_quote(&quote, "INV-1000".to_string(), 30);

    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.paid_amount, Decimal::ZERO);
    assert_eq!(invoice.balance, dec!(500));
    assert_eq!(invoice.total, dec!(500));
}

#[test]
fn test_converted_invoice_copies_totals_and_items() {
    let quote = quote();
    let invoice = Invoice::from_quote(&quote, "INV-1000".to_string(), 30);

    assert_eq!(invoice.subtotal, quote.subtotal);
    assert_eq!(invoice.tax_amount, quote.tax_amount);
    assert_eq!(invoice.total, quote.total);

    assert_eq!(invoice.line_items.len(), quote.line_items.len());
    for (inv_item, quote_item) in invoice.line_items.iter().zip(&quote.line_items) {
        assert_eq!(inv_item.description, quote_item.description);
        assert_eq!(inv_item.quantity, quote_item.quantity);
        assert_eq!(inv_item.unit_price, quote_item.unit_price);
        assert_eq!(inv_item.tax_rate, quote_item.tax_rate);
        // Items are new rows on the invoice side, not shared with the quote
        assert!(inv_item.id.is_none());
    }
}

#[test]
fn test_due_date_falls_after_the_quote_date() {
    let quote = quote();

    let invoice = Invoice::from_quote(&quote, "INV-1000".to_string(), 30);
    assert_eq!(invoice.date, quote.date);
    assert_eq!(invoice.due_date, quote.date + Duration::days(30));

    let invoice = Invoice::from_quote(&quote, "INV-1001".to_string(), 14);
    assert_eq!(invoice.due_date, quote.date + Duration::days(14));
}

#[test]
fn test_converted_invoice_links_back_to_the_quote() {
    let quote = quote();
    let invoice = Invoice::from_quote(&quote, "INV-1000".to_string(), 30);

    assert_eq!(invoice.quote_id.as_deref(), Some(quote.id.as_str()));
    assert_eq!(invoice.client_id, quote.client_id);
    assert_eq!(invoice.notes.as_deref(), Some("Net 30"));
}

#[test]
fn test_converted_invoice_accepts_payments() {
    let quote = quote();
    let mut invoice = Invoice::from_quote(&quote, "INV-1000".to_string(), 30);

    invoice.apply_payment(dec!(500)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}
