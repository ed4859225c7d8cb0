use std::collections::BTreeMap;

use tracing::debug;

use super::{Contact, ContactStatus};
use crate::core::DocumentError;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `items` into the requested 1-based page.
///
/// A page past the end returns the last page; page 0 is treated as 1.
/// `per_page` of 0 is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
        total_items,
    }
}

/// In-memory contact collection with id assignment, search and filtering.
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    contacts: BTreeMap<u64, Contact>,
    next_id: u64,
}

impl ContactBook {
    pub fn new() -> Self {
        Self {
            contacts: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Add a contact, assigning a fresh id. Returns the id.
    pub fn add(&mut self, mut contact: Contact) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        contact.id = id;
        debug!(contact = id, name = %contact.name, "contact added");
        self.contacts.insert(id, contact);
        id
    }

    /// Add many contacts; returns the assigned ids in order.
    pub fn extend(&mut self, contacts: impl IntoIterator<Item = Contact>) -> Vec<u64> {
        contacts.into_iter().map(|c| self.add(c)).collect()
    }

    pub fn get(&self, id: u64) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    /// Replace the contact with `contact.id`.
    pub fn update(&mut self, contact: Contact) -> Result<(), DocumentError> {
        let Some(slot) = self.contacts.get_mut(&contact.id) else {
            return Err(DocumentError::Builder(format!(
                "no contact with id {}",
                contact.id
            )));
        };
        *slot = contact;
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Option<Contact> {
        self.contacts.remove(&id)
    }

    /// All contacts ordered by id.
    pub fn all(&self) -> Vec<Contact> {
        self.contacts.values().cloned().collect()
    }

    /// Case-insensitive substring match over name, email, company and tags.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<Contact> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.all();
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        self.contacts
            .values()
            .filter(|c| {
                hit(&c.name)
                    || c.email.as_deref().is_some_and(hit)
                    || c.company.as_deref().is_some_and(hit)
                    || c.tags.iter().any(|t| hit(t))
            })
            .cloned()
            .collect()
    }

    pub fn filter_status(&self, status: ContactStatus) -> Vec<Contact> {
        self.contacts
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    /// Whether some contact already uses this email (case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.contacts.values().any(|c| {
            c.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email.trim()))
        })
    }
}
