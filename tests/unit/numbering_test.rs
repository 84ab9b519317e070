// Tests for document number formatting and parsing.
//
// Numbers are issued as a per-company counter and rendered as
// `<prefix><zero-padded integer>`. Formatting must be injective for a fixed
// prefix, and parsing must recover the counter value for every number the
// formatter can produce.

use proptest::prelude::*;

use facturio::modules::numbering::NumberingService;

#[test]
fn test_default_invoice_and_quote_shapes() {
    assert_eq!(NumberingService::format_number("INV-", 1000, 4), "INV-1000");
    assert_eq!(NumberingService::format_number("INV-", 8, 4), "INV-0008");
    assert_eq!(NumberingService::format_number("Q-", 1, 4), "Q-0001");
}

#[test]
fn test_pad_width_is_a_minimum_not_a_cap() {
    assert_eq!(
        NumberingService::format_number("INV-", 123456, 4),
        "INV-123456"
    );
}

#[test]
fn test_custom_prefix_and_width() {
    assert_eq!(
        NumberingService::format_number("2024/", 42, 6),
        "2024/000042"
    );
}

#[test]
fn test_parse_rejects_foreign_prefix() {
    assert_eq!(NumberingService::parse_number("INV-", "Q-0001"), None);
}

#[test]
fn test_parse_rejects_non_numeric_remainder() {
    assert_eq!(NumberingService::parse_number("INV-", "INV-FINAL"), None);
}

proptest! {
    #[test]
    fn test_format_parse_round_trip(
        number in 1i64..1_000_000_000i64,
        pad_width in 1u32..10u32
    ) {
        let formatted = NumberingService::format_number("INV-", number, pad_width);

        prop_assert_eq!(
            NumberingService::parse_number("INV-", &formatted),
            Some(number)
        );
    }

    #[test]
    fn test_formatted_length_honors_pad_width(
        number in 1i64..10_000i64,
        pad_width in 4u32..8u32
    ) {
        let formatted = NumberingService::format_number("Q-", number, pad_width);

        prop_assert!(formatted.len() >= "Q-".len() + pad_width as usize);
    }

    #[test]
    fn test_formatting_is_injective(
        a in 1i64..1_000_000i64,
        b in 1i64..1_000_000i64,
        pad_width in 1u32..8u32
    ) {
        prop_assume!(a != b);

        prop_assert_ne!(
            NumberingService::format_number("INV-", a, pad_width),
            NumberingService::format_number("INV-", b, pad_width)
        );
    }
}
