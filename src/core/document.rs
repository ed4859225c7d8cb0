use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::builder::MAX_ITEMS;
use super::calculator;
use super::error::DocumentError;
use super::sanitize::{clamp_amount, clamp_rate};
use super::status::DocumentStatus;
use super::types::*;

impl Document {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Derived totals at full precision.
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    /// Payment due date (invoices only).
    pub fn due_date(&self) -> Option<NaiveDate> {
        match self.kind {
            DocumentKind::Invoice => self.deadline,
            DocumentKind::Quote => None,
        }
    }

    /// Offer expiry date (quotes only).
    pub fn valid_until(&self) -> Option<NaiveDate> {
        match self.kind {
            DocumentKind::Quote => self.deadline,
            DocumentKind::Invoice => None,
        }
    }

    /// Re-derive every line total and the document totals.
    ///
    /// Also re-clamps the rates, so documents deserialized from outside
    /// sources are brought back into a consistent state.
    pub fn recompute(&mut self) {
        self.discount_rate = clamp_rate(self.discount_rate);
        self.tax_rate = clamp_rate(self.tax_rate);
        for item in &mut self.items {
            item.quantity = clamp_amount(item.quantity);
            item.unit_price = clamp_amount(item.unit_price);
            item.recompute();
        }
        self.totals = calculator::recompute(&self.items, self.discount_rate, self.tax_rate);
    }

    /// Append an empty item with the next free numeric id and return it.
    pub fn add_item(&mut self) -> Result<&LineItem, DocumentError> {
        self.check_capacity()?;
        let id = self.next_item_id();
        debug!(document = %self.number, item = %id, "adding empty line item");
        self.items.push(LineItem::empty(id));
        self.recompute();
        Ok(&self.items[self.items.len() - 1])
    }

    /// Append a prepared item. Its id must not already be in use.
    pub fn push_item(&mut self, item: LineItem) -> Result<(), DocumentError> {
        self.check_capacity()?;
        if self.item(&item.id).is_some() {
            return Err(DocumentError::Builder(format!(
                "line item id '{}' is already used in document {}",
                item.id, self.number
            )));
        }
        debug!(document = %self.number, item = %item.id, "adding line item");
        self.items.push(item);
        self.recompute();
        Ok(())
    }

    /// Remove an item by id and return it.
    pub fn remove_item(&mut self, id: &str) -> Result<LineItem, DocumentError> {
        let pos = self.position(id)?;
        let removed = self.items.remove(pos);
        debug!(document = %self.number, item = %id, "removed line item");
        self.recompute();
        Ok(removed)
    }

    /// Set an item's quantity. Negative values are clamped to zero.
    pub fn set_quantity(&mut self, id: &str, quantity: Decimal) -> Result<(), DocumentError> {
        let pos = self.position(id)?;
        self.items[pos].quantity = clamp_amount(quantity);
        debug!(document = %self.number, item = %id, %quantity, "quantity changed");
        self.recompute();
        Ok(())
    }

    /// Set an item's unit price. Negative values are clamped to zero.
    pub fn set_unit_price(&mut self, id: &str, unit_price: Decimal) -> Result<(), DocumentError> {
        let pos = self.position(id)?;
        self.items[pos].unit_price = clamp_amount(unit_price);
        debug!(document = %self.number, item = %id, %unit_price, "unit price changed");
        self.recompute();
        Ok(())
    }

    pub fn set_description(
        &mut self,
        id: &str,
        description: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let pos = self.position(id)?;
        self.items[pos].description = description.into();
        Ok(())
    }

    /// Set the discount percentage, clamped into `[0, 100]`.
    pub fn set_discount_rate(&mut self, rate: Decimal) {
        self.discount_rate = clamp_rate(rate);
        debug!(document = %self.number, rate = %self.discount_rate, "discount rate changed");
        self.recompute();
    }

    /// Set the tax percentage, clamped into `[0, 100]`.
    pub fn set_tax_rate(&mut self, rate: Decimal) {
        self.tax_rate = clamp_rate(rate);
        debug!(document = %self.number, rate = %self.tax_rate, "tax rate changed");
        self.recompute();
    }

    fn check_capacity(&self) -> Result<(), DocumentError> {
        if self.items.len() >= MAX_ITEMS {
            return Err(DocumentError::Builder(format!(
                "document {} already has {MAX_ITEMS} line items",
                self.number
            )));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, DocumentError> {
        self.items.iter().position(|i| i.id == id).ok_or_else(|| {
            DocumentError::Builder(format!(
                "no line item '{id}' in document {}",
                self.number
            ))
        })
    }

    fn next_item_id(&self) -> String {
        let mut next = self
            .items
            .iter()
            .filter_map(|i| i.id.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1);
        while self.item(&next.to_string()).is_some() {
            next += 1;
        }
        next.to_string()
    }
}
