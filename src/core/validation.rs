use std::collections::HashSet;

use rust_decimal::Decimal;

use super::calculator;
use super::error::ValidationError;
use super::sanitize::{MAX_AMOUNT, MAX_RATE};
use super::types::*;

/// Validate a document's structure and arithmetic.
/// Returns all validation errors found (not just the first).
pub fn validate_document(doc: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if doc.number.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "number",
            "document number must not be empty",
            "DOC-01",
        ));
    }

    let code = doc.currency_code.as_str();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::with_rule(
            "currency_code",
            format!("currency code '{code}' must be 3 uppercase letters (ISO 4217)"),
            "DOC-02",
        ));
    }

    validate_rate(doc.discount_rate, "discount_rate", &mut errors);
    validate_rate(doc.tax_rate, "tax_rate", &mut errors);

    let mut seen = HashSet::new();
    for (i, item) in doc.items.iter().enumerate() {
        validate_item(item, i, &mut errors);
        if !seen.insert(item.id.as_str()) {
            errors.push(ValidationError::with_rule(
                format!("items.{i}.id"),
                format!("line item id '{}' is not unique", item.id),
                "DOC-05",
            ));
        }
    }

    if let Some(deadline) = doc.deadline {
        if deadline < doc.date {
            let what = match doc.kind {
                DocumentKind::Invoice => "due date",
                DocumentKind::Quote => "valid-until date",
            };
            errors.push(ValidationError::with_rule(
                "deadline",
                format!("{what} {deadline} is before the document date {}", doc.date),
                "DOC-06",
            ));
        }
    }

    if !doc.status.is_allowed_for(doc.kind) {
        errors.push(ValidationError::with_rule(
            "status",
            format!("status {} does not exist for a {}", doc.status, doc.kind),
            "DOC-07",
        ));
    }

    errors.extend(validate_arithmetic(doc));

    errors
}

/// Check that every derived amount matches its inputs.
pub fn validate_arithmetic(doc: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, item) in doc.items.iter().enumerate() {
        let expected = calculator::line_total(item.quantity, item.unit_price);
        if item.total != expected {
            errors.push(ValidationError::with_rule(
                format!("items.{i}.total"),
                format!(
                    "line total {} does not match quantity {} * unit price {}",
                    item.total, item.quantity, item.unit_price
                ),
                "DOC-10",
            ));
        }
    }

    let t = &doc.totals;

    let expected_subtotal = calculator::sum_line_totals(&doc.items);
    if t.subtotal != expected_subtotal {
        errors.push(ValidationError::with_rule(
            "totals.subtotal",
            format!(
                "subtotal {} does not match sum of line totals {}",
                t.subtotal, expected_subtotal
            ),
            "DOC-11",
        ));
    }

    let expected_discount = calculator::percent_of(t.subtotal, doc.discount_rate);
    let expected_taxable = t.subtotal.checked_sub(t.discount_amount);
    if t.discount_amount != expected_discount || Some(t.taxable_amount) != expected_taxable {
        errors.push(ValidationError::with_rule(
            "totals.discount_amount",
            format!(
                "discount {} / taxable {} do not match subtotal {} at {}%",
                t.discount_amount, t.taxable_amount, t.subtotal, doc.discount_rate
            ),
            "DOC-12",
        ));
    }

    let expected_tax = calculator::percent_of(t.taxable_amount, doc.tax_rate);
    if t.tax_amount != expected_tax {
        errors.push(ValidationError::with_rule(
            "totals.tax_amount",
            format!(
                "tax {} does not match taxable amount {} at {}%",
                t.tax_amount, t.taxable_amount, doc.tax_rate
            ),
            "DOC-13",
        ));
    }

    if t.total != calculator::saturating_add(t.taxable_amount, t.tax_amount) {
        errors.push(ValidationError::with_rule(
            "totals.total",
            format!(
                "total {} does not match taxable {} + tax {}",
                t.total, t.taxable_amount, t.tax_amount
            ),
            "DOC-14",
        ));
    }

    errors
}

fn validate_rate(rate: Decimal, field: &str, errors: &mut Vec<ValidationError>) {
    if rate < Decimal::ZERO || rate > MAX_RATE {
        errors.push(ValidationError::with_rule(
            field,
            format!("rate {rate} must be between 0 and 100"),
            "DOC-03",
        ));
    }
}

fn validate_item(item: &LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("items.{index}");

    if item.id.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.id"),
            "line item id must not be empty",
            "DOC-05",
        ));
    }

    if item.quantity < Decimal::ZERO || item.quantity > MAX_AMOUNT {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.quantity"),
            format!("quantity {} must be between 0 and {MAX_AMOUNT}", item.quantity),
            "DOC-04",
        ));
    }

    if item.unit_price < Decimal::ZERO || item.unit_price > MAX_AMOUNT {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.unit_price"),
            format!("unit price {} must be between 0 and {MAX_AMOUNT}", item.unit_price),
            "DOC-04",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::DocumentBuilder;
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn doc() -> Document {
        DocumentBuilder::new(
            DocumentKind::Invoice,
            "INV-2024-001",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .add_item(LineItem::new("1", "Widget", dec!(4), dec!(12.5)))
        .discount_rate(dec!(5))
        .tax_rate(dec!(10))
        .build()
        .unwrap()
    }

    #[test]
    fn consistent_document_passes() {
        assert!(validate_document(&doc()).is_empty());
    }

    #[test]
    fn tampered_totals_are_reported() {
        let mut d = doc();
        d.totals.total += dec!(0.01);
        let errors = validate_arithmetic(&d);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("DOC-14"));
    }

    #[test]
    fn stale_line_total_is_reported() {
        let mut d = doc();
        d.items[0].quantity = dec!(5);
        let rules: Vec<_> = validate_arithmetic(&d)
            .into_iter()
            .filter_map(|e| e.rule)
            .collect();
        assert!(rules.contains(&"DOC-10".to_string()));
    }

    #[test]
    fn lowercase_currency_is_rejected() {
        let mut d = doc();
        d.currency_code = "usd".into();
        let errors = validate_document(&d);
        assert!(errors.iter().any(|e| e.rule.as_deref() == Some("DOC-02")));
    }

    #[test]
    fn quote_status_on_invoice_is_rejected() {
        let mut d = doc();
        d.status = super::super::status::DocumentStatus::Accepted;
        let errors = validate_document(&d);
        assert!(errors.iter().any(|e| e.rule.as_deref() == Some("DOC-07")));
    }
}
