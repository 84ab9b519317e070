use rust_decimal::Decimal;

/// Decimal places used for all persisted monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to the monetary scale using round-half-even.
///
/// Applied at the point totals are finalized for persistence so repeated
/// recomputation from the same line items yields identical stored values.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Validates that an amount carries no more precision than the monetary scale
/// and is not negative.
pub fn validate_amount(amount: Decimal) -> std::result::Result<(), String> {
    if amount.scale() > MONEY_SCALE {
        return Err(format!(
            "Amounts must have at most {} decimal places, got {}",
            MONEY_SCALE,
            amount.scale()
        ));
    }

    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative".to_string());
    }

    Ok(())
}

/// Formats an amount for display with the monetary scale.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.width$}", amount, width = MONEY_SCALE as usize)
}
