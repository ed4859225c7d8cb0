use tracing::{info, warn};

use super::{Contact, ContactStatus, is_valid_email, is_valid_phone};
use crate::core::DocumentError;

/// Contact field that a column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Company,
    Status,
    Tags,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Company,
        ContactField::Status,
        ContactField::Tags,
    ];

    /// Header names recognised for this field, lower-case.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name", "full name", "contact", "contact name"],
            Self::Email => &["email", "e-mail", "email address"],
            Self::Phone => &["phone", "telephone", "phone number", "mobile"],
            Self::Company => &["company", "organization", "organisation"],
            Self::Status => &["status", "stage"],
            Self::Tags => &["tags", "labels"],
        }
    }
}

/// Which column holds which contact field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    columns: Vec<(ContactField, usize)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `field` to the 0-based `column`, replacing an earlier mapping.
    pub fn map(mut self, field: ContactField, column: usize) -> Self {
        self.columns.retain(|(f, _)| *f != field);
        self.columns.push((field, column));
        self
    }

    /// Build a mapping from a header row by case-insensitive name.
    /// The name column is required.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self, DocumentError> {
        let mut mapping = Self::new();
        for field in ContactField::ALL {
            let found = header.iter().position(|h| {
                let h = h.as_ref().trim().to_lowercase();
                field.aliases().contains(&h.as_str())
            });
            if let Some(column) = found {
                mapping = mapping.map(field, column);
            }
        }
        if mapping.column(ContactField::Name).is_none() {
            return Err(DocumentError::Builder(
                "header has no name column".into(),
            ));
        }
        Ok(mapping)
    }

    pub fn column(&self, field: ContactField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    fn value<'a, S: AsRef<str>>(&self, row: &'a [S], field: ContactField) -> Option<&'a str> {
        self.column(field)
            .and_then(|c| row.get(c))
            .map(|v| v.as_ref().trim())
            .filter(|v| !v.is_empty())
    }
}

/// Problems found in one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based position of the row in the input.
    pub row: usize,
    pub messages: Vec<String>,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.messages.join("; "))
    }
}

/// Result of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub contacts: Vec<Contact>,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn rows_processed(&self) -> usize {
        self.contacts.len() + self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate rows into contacts.
///
/// Rows that are entirely blank are skipped. Every other row either
/// becomes a contact or a [`RowError`] listing all of its problems.
/// `rows` must not include the header row.
pub fn import_rows<R, S>(rows: &[R], mapping: &FieldMapping) -> ImportReport
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.iter().all(|v| v.as_ref().trim().is_empty()) {
            continue;
        }
        match parse_row(row, mapping) {
            Ok(contact) => report.contacts.push(contact),
            Err(messages) => {
                let err = RowError {
                    row: index + 1,
                    messages,
                };
                warn!(row = err.row, error = %err, "contact row rejected");
                report.errors.push(err);
            }
        }
    }

    info!(
        imported = report.contacts.len(),
        rejected = report.errors.len(),
        "contact import finished"
    );
    report
}

fn parse_row<S: AsRef<str>>(row: &[S], mapping: &FieldMapping) -> Result<Contact, Vec<String>> {
    let mut messages = Vec::new();

    let name = mapping.value(row, ContactField::Name);
    if name.is_none() {
        messages.push("name is required".to_string());
    }

    let email = mapping.value(row, ContactField::Email);
    if let Some(email) = email {
        if !is_valid_email(email) {
            messages.push(format!("invalid email '{email}'"));
        }
    }

    let phone = mapping.value(row, ContactField::Phone);
    if let Some(phone) = phone {
        if !is_valid_phone(phone) {
            messages.push(format!("invalid phone '{phone}'"));
        }
    }

    let status = match mapping.value(row, ContactField::Status) {
        None => ContactStatus::default(),
        Some(label) => ContactStatus::from_label(label).unwrap_or_else(|| {
            messages.push(format!("unknown status '{label}'"));
            ContactStatus::default()
        }),
    };

    if !messages.is_empty() {
        return Err(messages);
    }

    Ok(Contact {
        id: 0,
        name: name.unwrap_or_default().to_string(),
        email: email.map(str::to_lowercase),
        phone: phone.map(String::from),
        company: mapping.value(row, ContactField::Company).map(String::from),
        status,
        tags: mapping
            .value(row, ContactField::Tags)
            .map(|t| {
                t.split([';', ','])
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_mapping_is_case_insensitive() {
        let m = FieldMapping::from_header(&["E-Mail", "Full Name", "Mobile"]).unwrap();
        assert_eq!(m.column(ContactField::Email), Some(0));
        assert_eq!(m.column(ContactField::Name), Some(1));
        assert_eq!(m.column(ContactField::Phone), Some(2));
        assert_eq!(m.column(ContactField::Company), None);
    }

    #[test]
    fn header_without_name_fails() {
        assert!(FieldMapping::from_header(&["email", "phone"]).is_err());
    }

    #[test]
    fn all_problems_of_a_row_are_reported() {
        let m = FieldMapping::new()
            .map(ContactField::Name, 0)
            .map(ContactField::Email, 1)
            .map(ContactField::Phone, 2);
        let rows = vec![vec!["", "not-an-email", "12"]];
        let report = import_rows(&rows, &m);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].messages.len(), 3);
    }

    #[test]
    fn remap_replaces_column() {
        let m = FieldMapping::new()
            .map(ContactField::Name, 0)
            .map(ContactField::Name, 3);
        assert_eq!(m.column(ContactField::Name), Some(3));
    }
}
