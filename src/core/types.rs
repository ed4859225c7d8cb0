use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round_money;
use super::status::DocumentStatus;

/// An invoice or quote with its line items and derived totals.
///
/// The item list, the two rates, the totals and the status are only
/// reachable through methods that keep the derived fields consistent.
/// Descriptive fields are public.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store key. Defaults to the document number.
    pub id: String,
    /// Human-facing document number (e.g. "INV-2024-001").
    pub number: String,
    pub(crate) kind: DocumentKind,
    /// Issue date.
    pub date: NaiveDate,
    /// Due date for invoices, valid-until date for quotes.
    pub deadline: Option<NaiveDate>,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Billed party.
    pub client: Option<Client>,
    pub(crate) items: Vec<LineItem>,
    pub(crate) discount_rate: Decimal,
    pub(crate) tax_rate: Decimal,
    pub(crate) totals: Totals,
    pub(crate) status: DocumentStatus,
    /// Free-form categorisation that sits beside the closed status set.
    pub category: Option<String>,
    /// Notes printed under the item table.
    pub notes: Option<String>,
    /// Payment or acceptance terms.
    pub terms: Option<String>,
}

/// Document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Quote,
}

impl DocumentKind {
    /// Default number prefix, used by [`DocumentNumberSequence::new`](super::DocumentNumberSequence::new).
    pub fn number_prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "INV-",
            Self::Quote => "QUO-",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Quote => "Quote",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The billed party as printed on the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            address: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// A single billable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) quantity: Decimal,
    pub(crate) unit_price: Decimal,
    pub(crate) total: Decimal,
}

impl LineItem {
    /// Create a line item. Negative quantity or price is clamped to zero.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        let mut item = Self {
            id: id.into(),
            description: description.into(),
            quantity: super::sanitize::clamp_amount(quantity),
            unit_price: super::sanitize::clamp_amount(unit_price),
            total: Decimal::ZERO,
        };
        item.recompute();
        item
    }

    /// An item with no description, zero quantity and zero price.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, "", Decimal::ZERO, Decimal::ZERO)
    }

    /// Re-derive `total = quantity * unit_price`.
    pub fn recompute(&mut self) {
        self.total = super::calculator::line_total(self.quantity, self.unit_price);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Line total at full precision.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// True when the row carries nothing billable or descriptive.
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty() && self.total.is_zero()
    }
}

/// Derived monetary fields of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// `subtotal * discount_rate / 100`.
    pub discount_amount: Decimal,
    /// `subtotal - discount_amount`.
    pub taxable_amount: Decimal,
    /// `taxable_amount * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// `taxable_amount + tax_amount`.
    pub total: Decimal,
}

impl Totals {
    /// All zero.
    pub const ZERO: Totals = Totals {
        subtotal: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        taxable_amount: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Each field rounded to 2 places for presentation.
    ///
    /// The rounded fields are rounded independently, so `total` is not
    /// guaranteed to equal `taxable_amount + tax_amount` after rounding.
    pub fn rounded(&self) -> Totals {
        Totals {
            subtotal: round_money(self.subtotal),
            discount_amount: round_money(self.discount_amount),
            taxable_amount: round_money(self.taxable_amount),
            tax_amount: round_money(self.tax_amount),
            total: round_money(self.total),
        }
    }
}
