//! Contact records, the contact book and row import.
//!
//! Import works on rows that have already been split into fields; the
//! caller owns the CSV reading. Every row is validated on its own: a bad
//! row yields a [`RowError`] and the remaining rows are still imported.
//!
//! # Example
//!
//! ```ignore
//! use billdoc::contacts::*;
//!
//! let mapping = FieldMapping::from_header(&header)?;
//! let report = import_rows(&rows, &mapping);
//! let mut book = ContactBook::new();
//! book.extend(report.contacts);
//! ```

mod book;
mod import;

use serde::{Deserialize, Serialize};

pub use book::{ContactBook, Page, paginate};
pub use import::{ContactField, FieldMapping, ImportReport, RowError, import_rows};

/// Relationship stage of a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Lead,
    Active,
    Inactive,
}

impl ContactStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "lead" => Some(Self::Lead),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A person or organisation in the contact book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Assigned by the book; zero until added.
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ContactStatus,
    pub tags: Vec<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            status: ContactStatus::default(),
            tags: Vec::new(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn status(mut self, status: ContactStatus) -> Self {
        self.status = status;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Billing party for a document.
    pub fn to_client(&self) -> crate::core::Client {
        crate::core::Client {
            name: self.company.clone().unwrap_or_else(|| self.name.clone()),
            email: self.email.clone(),
            address: None,
        }
    }
}

/// Loose email check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// Phone check: digits with optional leading `+` and common separators,
/// 7 to 15 digits in total.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.'))
    {
        return false;
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits)
}
