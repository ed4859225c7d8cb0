use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places using half-up (commercial rounding).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Symbol for the handful of currencies shown with one; `None` otherwise.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Format an amount for display: rounded to 2 places with thousands separators.
///
/// ```
/// use billdoc::core::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(9649.899), "USD"), "$9,649.90");
/// assert_eq!(format_amount(dec!(12.5), "CHF"), "CHF 12.50");
/// ```
pub fn format_amount(value: Decimal, currency_code: &str) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match currency_symbol(currency_code) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{frac_part}"),
        None => format!("{sign}{currency_code} {grouped}.{frac_part}"),
    }
}

/// Format a percentage rate without trailing zeros (e.g. "7.5%").
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(0.124)), dec!(0.12));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(dec!(1234567.5), "EUR"), "€1,234,567.50");
        assert_eq!(format_amount(dec!(999), "USD"), "$999.00");
        assert_eq!(format_amount(dec!(0), "USD"), "$0.00");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_amount(dec!(-1500), "GBP"), "-£1,500.00");
    }

    #[test]
    fn rates_drop_trailing_zeros() {
        assert_eq!(format_rate(dec!(7.50)), "7.5%");
        assert_eq!(format_rate(dec!(19)), "19%");
    }
}
