use chrono::NaiveDate;
use tracing::{info, warn};

use super::error::DocumentError;
use super::repository::DocumentStore;
use super::status::{DocumentStatus, TransitionPolicy};
use super::types::{Document, DocumentKind};

/// Persist the document with its current status unchanged.
///
/// Totals are recomputed first so the store never sees stale values.
pub fn save<S>(doc: &mut Document, store: &mut S) -> Result<(), DocumentError>
where
    S: DocumentStore + ?Sized,
{
    doc.recompute();
    store.save(doc).inspect_err(|e| {
        warn!(document = %doc.number, error = %e, "save failed");
    })?;
    info!(document = %doc.number, status = %doc.status, total = %doc.totals.total, "document saved");
    Ok(())
}

/// Mark the document as sent and persist it.
///
/// Under [`TransitionPolicy::Permissive`] this works from any state.
/// Under [`TransitionPolicy::Strict`] a document in a terminal state is
/// rejected. If the store fails, the previous status is restored.
pub fn send<S>(
    doc: &mut Document,
    store: &mut S,
    policy: TransitionPolicy,
) -> Result<(), DocumentError>
where
    S: DocumentStore + ?Sized,
{
    let previous = doc.status;
    set_status(doc, DocumentStatus::Sent, policy)?;
    doc.recompute();
    if let Err(e) = store.save(doc) {
        warn!(document = %doc.number, error = %e, "send failed, status restored");
        doc.status = previous;
        return Err(e);
    }
    info!(document = %doc.number, from = %previous, total = %doc.totals.total, "document sent");
    Ok(())
}

/// Change the status in memory without persisting.
///
/// The status must exist for the document's kind; the policy decides
/// whether terminal states may be left.
pub fn set_status(
    doc: &mut Document,
    status: DocumentStatus,
    policy: TransitionPolicy,
) -> Result<(), DocumentError> {
    if !policy.allows(doc.kind, doc.status, status) {
        let reason = if status.is_allowed_for(doc.kind) {
            format!(
                "{} {} is {} and cannot change to {}",
                doc.kind, doc.number, doc.status, status
            )
        } else {
            format!("status {} does not exist for a {}", status, doc.kind)
        };
        warn!(document = %doc.number, from = %doc.status, to = %status, "status change rejected");
        return Err(DocumentError::Transition(reason));
    }
    doc.status = status;
    Ok(())
}

/// Move a sent invoice past its due date to `Overdue`.
/// Returns whether the status changed.
pub fn mark_overdue(doc: &mut Document, today: NaiveDate) -> bool {
    let past_due = doc.due_date().is_some_and(|due| due < today);
    if doc.kind == DocumentKind::Invoice && doc.status == DocumentStatus::Sent && past_due {
        doc.status = DocumentStatus::Overdue;
        info!(document = %doc.number, "invoice is overdue");
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::DocumentBuilder;
    use super::super::repository::MemoryStore;
    use super::*;
    use rust_decimal_macros::dec;

    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn save(&mut self, _doc: &Document) -> Result<(), DocumentError> {
            Err(DocumentError::Store("disk full".into()))
        }
        fn load(&self, _id: &str) -> Result<Option<Document>, DocumentError> {
            Ok(None)
        }
        fn list(&self) -> Result<Vec<Document>, DocumentError> {
            Ok(Vec::new())
        }
        fn delete(&mut self, _id: &str) -> Result<bool, DocumentError> {
            Ok(false)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice() -> Document {
        DocumentBuilder::new(DocumentKind::Invoice, "INV-2024-010", date(2024, 4, 1))
            .deadline(date(2024, 4, 30))
            .build()
            .unwrap()
    }

    #[test]
    fn save_keeps_draft() {
        let mut doc = invoice();
        let mut store = MemoryStore::new();
        save(&mut doc, &mut store).unwrap();
        let stored = store.load("INV-2024-010").unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Draft);
    }

    #[test]
    fn send_forces_sent_and_persists() {
        let mut doc = invoice();
        doc.set_quantity("1", dec!(1)).unwrap();
        doc.set_unit_price("1", dec!(10)).unwrap();
        let mut store = MemoryStore::new();
        send(&mut doc, &mut store, TransitionPolicy::Permissive).unwrap();
        assert_eq!(doc.status(), DocumentStatus::Sent);
        let stored = store.load(&doc.id).unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Sent);
        assert_eq!(stored.totals().total, dec!(10));
    }

    #[test]
    fn failed_send_restores_status() {
        let mut doc = invoice();
        let err = send(&mut doc, &mut FailingStore, TransitionPolicy::Permissive).unwrap_err();
        assert!(matches!(err, DocumentError::Store(_)));
        assert_eq!(doc.status(), DocumentStatus::Draft);
    }

    #[test]
    fn strict_policy_rejects_send_from_paid() {
        let mut doc = invoice();
        set_status(&mut doc, DocumentStatus::Paid, TransitionPolicy::Strict).unwrap();
        let err = send(&mut doc, &mut MemoryStore::new(), TransitionPolicy::Strict).unwrap_err();
        assert!(matches!(err, DocumentError::Transition(_)));
        assert_eq!(doc.status(), DocumentStatus::Paid);
    }

    #[test]
    fn overdue_only_after_due_date() {
        let mut doc = invoice();
        assert!(!mark_overdue(&mut doc, date(2024, 5, 2)));
        set_status(&mut doc, DocumentStatus::Sent, TransitionPolicy::Permissive).unwrap();
        assert!(!mark_overdue(&mut doc, date(2024, 4, 30)));
        assert!(mark_overdue(&mut doc, date(2024, 5, 1)));
        assert_eq!(doc.status(), DocumentStatus::Overdue);
    }
}
