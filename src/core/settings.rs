use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::numbering::YearRollover;
use super::status::TransitionPolicy;
use super::types::DocumentKind;

/// Workbench defaults applied to new documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSettings {
    /// Currency for new documents (ISO 4217).
    pub currency_code: String,
    /// Default tax percentage.
    pub tax_rate: Decimal,
    /// Default discount percentage.
    pub discount_rate: Decimal,
    /// Number prefix for invoices.
    pub invoice_prefix: String,
    /// Number prefix for quotes.
    pub quote_prefix: String,
    /// Zero-padding width of the sequential part of document numbers.
    pub number_padding: usize,
    /// Counter behaviour when the document year changes.
    pub year_rollover: YearRollover,
    /// Days between issue date and due date for invoices.
    pub payment_terms_days: u32,
    /// Days a quote stays valid.
    pub quote_validity_days: u32,
    /// Status change checking.
    pub transition_policy: TransitionPolicy,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            currency_code: "USD".into(),
            tax_rate: Decimal::ZERO,
            discount_rate: Decimal::ZERO,
            invoice_prefix: DocumentKind::Invoice.number_prefix().into(),
            quote_prefix: DocumentKind::Quote.number_prefix().into(),
            number_padding: 3,
            year_rollover: YearRollover::Restart,
            payment_terms_days: 30,
            quote_validity_days: 30,
            transition_policy: TransitionPolicy::Permissive,
        }
    }
}

impl WorkbenchSettings {
    pub fn prefix_for(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Invoice => &self.invoice_prefix,
            DocumentKind::Quote => &self.quote_prefix,
        }
    }

    /// Days from issue date to the deadline for the given kind.
    pub fn deadline_days(&self, kind: DocumentKind) -> u32 {
        match kind {
            DocumentKind::Invoice => self.payment_terms_days,
            DocumentKind::Quote => self.quote_validity_days,
        }
    }
}
