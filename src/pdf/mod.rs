//! PDF export of invoices and quotes.
//!
//! Renders an already-consistent [`Document`] through one of the built-in
//! [`Template`]s. The document is borrowed immutably for the whole render,
//! so it cannot change mid-export. Failures are returned as
//! [`DocumentError::Export`] and can be turned into a user-facing
//! [`ExportStatus`]; nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use billdoc::pdf::*;
//!
//! let bytes = render_pdf(&doc, Template::Modern)?;
//! std::fs::write(file_name(&doc), bytes)?;
//! ```

mod layout;
mod render;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{Document, DocumentError};

pub use render::render_pdf;

/// Visual template for the exported page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Bold upper-case heading with ruled table.
    #[default]
    Classic,
    /// Coloured header band.
    Modern,
    /// Small heading, no rules.
    Minimal,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Classic, Template::Modern, Template::Minimal];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Minimal => "minimal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Outcome of an export, phrased for display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Exported { file_name: String, bytes: usize },
    Failed { message: String },
}

impl ExportStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Exported { file_name, bytes } => {
                format!("Exported {file_name} ({bytes} bytes)")
            }
            Self::Failed { message } => format!("Export failed: {message}"),
        }
    }
}

/// Suggested download name, e.g. `INV-2024-001.pdf`.
///
/// Characters that are unsafe in file names are replaced by `_`.
pub fn file_name(doc: &Document) -> String {
    let stem: String = doc
        .number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        format!("{}.pdf", doc.kind().label().to_ascii_lowercase())
    } else {
        format!("{stem}.pdf")
    }
}

/// Render and write the PDF into `dir`, reporting the outcome as a status.
pub fn export_to_dir(doc: &Document, template: Template, dir: &Path) -> ExportStatus {
    let name = file_name(doc);
    let result = render_pdf(doc, template).and_then(|bytes| {
        let path = dir.join(&name);
        std::fs::write(&path, &bytes).map_err(|e| {
            DocumentError::Export(format!("failed to write {}: {e}", path.display()))
        })?;
        Ok(bytes.len())
    });
    match result {
        Ok(bytes) => {
            info!(document = %doc.number, template = template.name(), bytes, "PDF exported");
            ExportStatus::Exported {
                file_name: name,
                bytes,
            }
        }
        Err(e) => {
            warn!(document = %doc.number, error = %e, "PDF export failed");
            ExportStatus::Failed {
                message: e.to_string(),
            }
        }
    }
}
