use serde::{Deserialize, Serialize};

use super::types::DocumentKind;

/// Workflow state of a document.
///
/// The set is closed. Invoices use `Draft`, `Sent`, `Paid`, `Overdue`,
/// `Cancelled`; quotes use `Draft`, `Sent`, `Accepted`, `Declined`,
/// `Cancelled`. Custom grouping goes in [`Document::category`](super::Document::category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Accepted,
    Declined,
    Cancelled,
}

const INVOICE_OPTIONS: &[DocumentStatus] = &[
    DocumentStatus::Draft,
    DocumentStatus::Sent,
    DocumentStatus::Paid,
    DocumentStatus::Overdue,
    DocumentStatus::Cancelled,
];

const QUOTE_OPTIONS: &[DocumentStatus] = &[
    DocumentStatus::Draft,
    DocumentStatus::Sent,
    DocumentStatus::Accepted,
    DocumentStatus::Declined,
    DocumentStatus::Cancelled,
];

/// Statuses selectable for a document kind, in display order.
pub fn status_options(kind: DocumentKind) -> &'static [DocumentStatus] {
    match kind {
        DocumentKind::Invoice => INVOICE_OPTIONS,
        DocumentKind::Quote => QUOTE_OPTIONS,
    }
}

impl DocumentStatus {
    /// Whether this status exists for the given document kind.
    pub fn is_allowed_for(&self, kind: DocumentKind) -> bool {
        status_options(kind).contains(self)
    }

    /// Whether the workflow ends here for the given kind.
    pub fn is_terminal_for(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Invoice => matches!(self, Self::Paid | Self::Cancelled),
            DocumentKind::Quote => {
                matches!(self, Self::Accepted | Self::Declined | Self::Cancelled)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse a label case-insensitively. "Canceled" is accepted too.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How strictly status changes are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status of the document's kind may be set from any state,
    /// including terminal ones, so mistakes can be corrected.
    #[default]
    Permissive,
    /// Terminal states are final: no `send()` and no status edits.
    Strict,
}

impl TransitionPolicy {
    /// Whether a document in `from` may move to `to`.
    pub fn allows(&self, kind: DocumentKind, from: DocumentStatus, to: DocumentStatus) -> bool {
        if !to.is_allowed_for(kind) {
            return false;
        }
        match self {
            Self::Permissive => true,
            Self::Strict => from == to || !from.is_terminal_for(kind),
        }
    }
}
