use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::error::DocumentError;
use super::sanitize::clamp_rate;
use super::settings::WorkbenchSettings;
use super::status::DocumentStatus;
use super::types::*;
use super::validation;

/// Most line items a document may hold.
pub const MAX_ITEMS: usize = 10_000;

/// Builder for invoices and quotes.
///
/// A document always starts in [`DocumentStatus::Draft`]. If no line item
/// is added, `build()` inserts one empty item with id `"1"`.
///
/// ```
/// use billdoc::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let doc = DocumentBuilder::new(DocumentKind::Invoice, "INV-2024-001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .client(Client::new("Northwind Traders").email("ap@northwind.test"))
///     .add_item(LineItem::new("1", "Consulting", dec!(10), dec!(150)))
///     .tax_rate(dec!(8))
///     .build()
///     .unwrap();
///
/// assert_eq!(doc.totals().total, dec!(1620));
/// ```
pub struct DocumentBuilder {
    id: Option<String>,
    number: String,
    kind: DocumentKind,
    date: NaiveDate,
    deadline: Option<NaiveDate>,
    currency_code: String,
    client: Option<Client>,
    items: Vec<LineItem>,
    discount_rate: Decimal,
    tax_rate: Decimal,
    category: Option<String>,
    notes: Option<String>,
    terms: Option<String>,
}

impl DocumentBuilder {
    pub fn new(kind: DocumentKind, number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            number: number.into(),
            kind,
            date,
            deadline: None,
            currency_code: "USD".to_string(),
            client: None,
            items: Vec::new(),
            discount_rate: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            category: None,
            notes: None,
            terms: None,
        }
    }

    /// Start from workbench defaults: currency, rates, and a deadline
    /// offset from `date` by the kind's configured number of days.
    pub fn from_settings(
        settings: &WorkbenchSettings,
        kind: DocumentKind,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let deadline = date.checked_add_days(Days::new(u64::from(settings.deadline_days(kind))));
        let mut builder = Self::new(kind, number, date)
            .currency(settings.currency_code.clone())
            .discount_rate(settings.discount_rate)
            .tax_rate(settings.tax_rate);
        builder.deadline = deadline;
        builder
    }

    /// Store key; defaults to the document number.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Due date for invoices, valid-until date for quotes.
    pub fn deadline(mut self, date: NaiveDate) -> Self {
        self.deadline = Some(date);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn discount_rate(mut self, rate: Decimal) -> Self {
        self.discount_rate = clamp_rate(rate);
        self
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = clamp_rate(rate);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    /// Build the document, computing totals and running validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Document, DocumentError> {
        let doc = self.build_unchecked()?;

        let errors = validation::validate_document(&doc);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DocumentError::Validation(msg));
        }

        Ok(doc)
    }

    /// Build without validation. Structural limits are still enforced.
    pub fn build_unchecked(mut self) -> Result<Document, DocumentError> {
        // Input limits to prevent abuse
        if self.items.len() > MAX_ITEMS {
            return Err(DocumentError::Builder(format!(
                "document cannot have more than {MAX_ITEMS} line items"
            )));
        }
        if self.number.len() > 200 {
            return Err(DocumentError::Builder(
                "document number cannot exceed 200 characters".into(),
            ));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(DocumentError::Builder(format!(
                    "line item id '{}' is used more than once",
                    item.id
                )));
            }
        }

        if self.items.is_empty() {
            self.items.push(LineItem::empty("1"));
        }

        let mut doc = Document {
            id: self.id.unwrap_or_else(|| self.number.clone()),
            number: self.number,
            kind: self.kind,
            date: self.date,
            deadline: self.deadline,
            currency_code: self.currency_code,
            client: self.client,
            items: self.items,
            discount_rate: self.discount_rate,
            tax_rate: self.tax_rate,
            totals: Totals::ZERO,
            status: DocumentStatus::Draft,
            category: self.category,
            notes: self.notes,
            terms: self.terms,
        };
        doc.recompute();
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_document_has_one_empty_item() {
        let doc = DocumentBuilder::new(DocumentKind::Quote, "QUO-2024-001", date(2024, 5, 1))
            .build()
            .unwrap();
        assert_eq!(doc.items().len(), 1);
        assert!(doc.items()[0].is_blank());
        assert_eq!(doc.status(), DocumentStatus::Draft);
        assert_eq!(doc.id, "QUO-2024-001");
    }

    #[test]
    fn settings_derive_deadline_and_rates() {
        let settings = WorkbenchSettings {
            tax_rate: dec!(7),
            payment_terms_days: 14,
            ..WorkbenchSettings::default()
        };
        let doc = DocumentBuilder::from_settings(
            &settings,
            DocumentKind::Invoice,
            "INV-2024-007",
            date(2024, 12, 20),
        )
        .build()
        .unwrap();
        assert_eq!(doc.due_date(), Some(date(2025, 1, 3)));
        assert_eq!(doc.tax_rate(), dec!(7));
        assert_eq!(doc.currency_code, "USD");
    }

    #[test]
    fn duplicate_item_ids_fail() {
        let result = DocumentBuilder::new(DocumentKind::Invoice, "INV-1", date(2024, 1, 1))
            .add_item(LineItem::new("a", "One", dec!(1), dec!(1)))
            .add_item(LineItem::new("a", "Two", dec!(1), dec!(2)))
            .build();
        assert!(matches!(result, Err(DocumentError::Builder(_))));
    }

    #[test]
    fn validation_errors_are_joined() {
        let result = DocumentBuilder::new(DocumentKind::Invoice, " ", date(2024, 1, 10))
            .deadline(date(2024, 1, 1))
            .build();
        let Err(DocumentError::Validation(msg)) = result else {
            panic!("expected validation error");
        };
        assert!(msg.contains("DOC-01"));
        assert!(msg.contains("DOC-06"));
    }
}
