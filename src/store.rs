//! JSON file document store.
//!
//! The whole collection lives in one JSON file. It is read once when the
//! store is opened and rewritten after every change, through a temporary
//! file that is renamed over the original so a crash never leaves a
//! half-written file behind.
//!
//! # Example
//!
//! ```ignore
//! use billdoc::core::*;
//! use billdoc::store::JsonFileStore;
//!
//! let mut store = JsonFileStore::open("documents.json")?;
//! lifecycle::save(&mut doc, &mut store)?;
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Document, DocumentError, DocumentStore};

/// On-disk layout, versioned so the format can evolve.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    documents: Vec<Document>,
}

const FORMAT_VERSION: u32 = 1;

/// Document store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    docs: BTreeMap<String, Document>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; the
    /// file is created on the first write.
    ///
    /// Loaded documents are recomputed, so hand-edited files cannot carry
    /// inconsistent totals into the application.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let docs = match fs::read_to_string(&path) {
            Ok(text) => parse(&text, &path)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(DocumentError::Store(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        info!(path = %path.display(), documents = docs.len(), "document store opened");
        Ok(Self { path, docs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), DocumentError> {
        let file = StoreFile {
            version: FORMAT_VERSION,
            documents: self.docs.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| DocumentError::Store(format!("failed to serialize documents: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            DocumentError::Store(format!("failed to write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            DocumentError::Store(format!(
                "failed to replace {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), documents = self.docs.len(), "document store flushed");
        Ok(())
    }
}

fn parse(text: &str, path: &Path) -> Result<BTreeMap<String, Document>, DocumentError> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let file: StoreFile = serde_json::from_str(text).map_err(|e| {
        DocumentError::Store(format!("failed to parse {}: {e}", path.display()))
    })?;
    if file.version > FORMAT_VERSION {
        return Err(DocumentError::Store(format!(
            "{} has format version {}, newest supported is {FORMAT_VERSION}",
            path.display(),
            file.version
        )));
    }
    Ok(file
        .documents
        .into_iter()
        .map(|mut doc| {
            doc.recompute();
            (doc.id.clone(), doc)
        })
        .collect())
}

impl DocumentStore for JsonFileStore {
    fn save(&mut self, doc: &Document) -> Result<(), DocumentError> {
        let previous = self.docs.insert(doc.id.clone(), doc.clone());
        if let Err(e) = self.flush() {
            // keep memory and disk in step
            match previous {
                Some(old) => self.docs.insert(doc.id.clone(), old),
                None => self.docs.remove(&doc.id),
            };
            return Err(e);
        }
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<Document>, DocumentError> {
        Ok(self.docs.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Document>, DocumentError> {
        Ok(self.docs.values().cloned().collect())
    }

    fn delete(&mut self, id: &str) -> Result<bool, DocumentError> {
        let Some(removed) = self.docs.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = self.flush() {
            self.docs.insert(id.to_string(), removed);
            return Err(e);
        }
        Ok(true)
    }
}
