use std::collections::BTreeMap;

use super::error::DocumentError;
use super::types::Document;

/// Persistence collaborator for documents.
///
/// Implementations receive documents whose totals are already consistent.
/// `list` returns documents ordered by id.
pub trait DocumentStore {
    fn save(&mut self, doc: &Document) -> Result<(), DocumentError>;

    fn load(&self, id: &str) -> Result<Option<Document>, DocumentError>;

    fn list(&self) -> Result<Vec<Document>, DocumentError>;

    /// Remove a document. Returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool, DocumentError>;
}

/// In-process store keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: BTreeMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, doc: &Document) -> Result<(), DocumentError> {
        self.docs.insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<Document>, DocumentError> {
        Ok(self.docs.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Document>, DocumentError> {
        Ok(self.docs.values().cloned().collect())
    }

    fn delete(&mut self, id: &str) -> Result<bool, DocumentError> {
        Ok(self.docs.remove(id).is_some())
    }
}
