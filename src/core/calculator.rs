use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::sanitize::{clamp_amount, clamp_rate};
use super::types::{LineItem, Totals};

/// `quantity * unit_price` at full precision. Negative inputs count as
/// zero, inputs above [`MAX_AMOUNT`](super::sanitize::MAX_AMOUNT) as the cap.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    saturating_mul(clamp_amount(quantity), clamp_amount(unit_price))
}

/// Derive subtotal, discount, tax and grand total from line items and rates.
///
/// Pure and total: rates outside `[0, 100]` are clamped, item totals are
/// summed exactly, so the result does not depend on item order and
/// repeated calls return identical values. Arithmetic saturates at
/// `Decimal::MAX` instead of overflowing.
///
/// ```
/// use billdoc::core::*;
/// use rust_decimal_macros::dec;
///
/// let items = vec![LineItem::new("1", "Design", dec!(2), dec!(50))];
/// let totals = recompute(&items, dec!(10), dec!(8));
/// assert_eq!(totals.subtotal, dec!(100));
/// assert_eq!(totals.discount_amount, dec!(10));
/// assert_eq!(totals.tax_amount, dec!(7.2));
/// assert_eq!(totals.total, dec!(97.2));
/// ```
pub fn recompute(items: &[LineItem], discount_rate: Decimal, tax_rate: Decimal) -> Totals {
    let subtotal = sum_line_totals(items);
    let discount_amount = percent_of(subtotal, discount_rate);
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = percent_of(taxable_amount, tax_rate);
    let total = saturating_add(taxable_amount, tax_amount);

    Totals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total,
    }
}

/// Sum of the stored line totals, saturating.
pub(crate) fn sum_line_totals(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, i| saturating_add(acc, i.total().max(Decimal::ZERO)))
}

/// `amount * rate / 100` with the rate clamped into `[0, 100]`.
///
/// The rate is scaled first, so the product never exceeds `amount`.
pub(crate) fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    saturating_mul(amount, clamp_rate(rate) / dec!(100))
}

pub(crate) fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, qty: Decimal, price: Decimal) -> LineItem {
        LineItem::new(id, format!("Item {id}"), qty, price)
    }

    fn pow10(exp: u32) -> Decimal {
        Decimal::from_i128_with_scale(10i128.pow(exp), 0)
    }

    #[test]
    fn empty_items_are_all_zero() {
        assert_eq!(recompute(&[], dec!(10), dec!(8)), Totals::ZERO);
    }

    #[test]
    fn discount_then_tax() {
        let totals = recompute(&[item("1", dec!(2), dec!(50))], dec!(10), dec!(8));
        assert_eq!(totals.subtotal, dec!(100));
        assert_eq!(totals.discount_amount, dec!(10));
        assert_eq!(totals.taxable_amount, dec!(90));
        assert_eq!(totals.tax_amount, dec!(7.2));
        assert_eq!(totals.total, dec!(97.2));
    }

    #[test]
    fn zero_rates_keep_subtotal() {
        let items = [item("1", dec!(3), dec!(19.99)), item("2", dec!(1), dec!(5))];
        let totals = recompute(&items, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(totals.subtotal, dec!(64.97));
    }

    #[test]
    fn out_of_range_rates_are_clamped() {
        let items = [item("1", dec!(1), dec!(200))];
        let totals = recompute(&items, dec!(150), dec!(-5));
        assert_eq!(totals.discount_amount, dec!(200));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(saturating_add(Decimal::MAX, Decimal::ONE), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MAX, dec!(100)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MAX, dec!(250)), Decimal::MAX);
        assert_eq!(line_total(Decimal::MAX, Decimal::MAX), pow10(24));
    }

    #[test]
    fn capped_items_sum_without_overflow() {
        let big = item("1", pow10(15), pow10(15));
        let items = vec![big; 10_000];
        let totals = recompute(&items, dec!(10), dec!(100));
        assert_eq!(totals.subtotal, pow10(28));
        assert_eq!(totals.discount_amount, pow10(27));
        assert_eq!(totals.total, pow10(28) * dec!(1.8));
    }

    #[test]
    fn full_precision_is_kept() {
        let totals = recompute(&[item("1", dec!(1), dec!(10.005))], Decimal::ZERO, dec!(19));
        assert_eq!(totals.tax_amount, dec!(1.90095));
        assert_eq!(totals.rounded().tax_amount, dec!(1.90));
    }
}
