//! Clamping of untyped numeric input.
//!
//! Form fields and imported data arrive as `f64` or text. Anything that is
//! not a finite, non-negative number becomes zero. Amounts are capped at
//! [`MAX_AMOUNT`] and rates at [`MAX_RATE`].

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;

/// Upper bound for percentage rates.
pub const MAX_RATE: Decimal = dec!(100);

/// Upper bound for a quantity or unit price: one trillion.
///
/// A line total is then at most 1e24, and the subtotal of a document at
/// the item limit stays far below `Decimal::MAX` (about 7.9e28).
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Clamp a decimal amount (quantity or price) into `[0, MAX_AMOUNT]`.
pub fn clamp_amount(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_AMOUNT)
}

/// Clamp a percentage rate into `[0, 100]`.
pub fn clamp_rate(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_RATE)
}

/// Convert a float amount. NaN, infinities and negatives become zero;
/// values above [`MAX_AMOUNT`] are capped.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .map(clamp_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Convert a float rate. NaN and infinities become zero; the result is capped at 100.
pub fn rate_from_f64(value: f64) -> Decimal {
    clamp_rate(amount_from_f64(value))
}

/// Parse an amount from text.
///
/// Surrounding whitespace is ignored and both `.` and a single `,` are
/// accepted as decimal separator. Unparsable input becomes zero.
pub fn amount_from_str(value: &str) -> Decimal {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map(clamp_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a rate from text, capped at 100. A trailing `%` is allowed.
pub fn rate_from_str(value: &str) -> Decimal {
    clamp_rate(amount_from_str(value.trim().trim_end_matches('%')))
}
