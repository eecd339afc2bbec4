use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domverify_core::{
    AuditEntry, DomainId, RecordId, Result, Status, VerificationRecord, VerifyError,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{RecordStore, Transition};

/// In-process [`RecordStore`].
///
/// Records are kept in insertion order, which doubles as the
/// "most recent" ordering for a domain's history.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: Vec<VerificationRecord>,
    index: HashMap<RecordId, usize>,
    audit: Vec<AuditEntry>,
}

impl Inner {
    fn pending_mut(&mut self, id: &RecordId) -> std::result::Result<&mut VerificationRecord, Transition> {
        let Some(&pos) = self.index.get(id) else {
            return Err(Transition::Missing);
        };
        let record = &mut self.records[pos];
        if record.is_pending() {
            Ok(record)
        } else {
            Err(Transition::Conflict(record.status))
        }
    }
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: VerificationRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.index.contains_key(&record.id) {
            return Err(VerifyError::Store(format!(
                "duplicate verification id {}",
                record.id
            )));
        }
        let pos = inner.records.len();
        inner.index.insert(record.id.clone(), pos);
        inner.records.push(record);
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<VerificationRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.index.get(id).map(|&pos| inner.records[pos].clone()))
    }

    async fn list(&self, status: Option<Status>) -> Result<Vec<VerificationRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn history(&self, domain: &DomainId) -> Result<Vec<VerificationRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .rev()
            .filter(|r| &r.domain_id == domain)
            .cloned()
            .collect())
    }

    async fn begin_attempt(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Transition> {
        let mut inner = self.inner.write().await;
        Ok(match inner.pending_mut(id) {
            Ok(record) => {
                record.attempts = record.attempts.saturating_add(1);
                record.last_checked_at = Some(at);
                record.updated_at = at;
                Transition::Committed(record.clone())
            }
            Err(outcome) => outcome,
        })
    }

    async fn transition(
        &self,
        id: &RecordId,
        to: Status,
        at: DateTime<Utc>,
        audit: Option<AuditEntry>,
    ) -> Result<Transition> {
        if !to.is_terminal() {
            return Err(VerifyError::Store(format!(
                "cannot transition verification {id} to {to}"
            )));
        }
        if audit.as_ref().is_some_and(|entry| &entry.record_id != id) {
            return Err(VerifyError::Store(format!(
                "audit entry does not belong to verification {id}"
            )));
        }
        let mut inner = self.inner.write().await;
        let committed = match inner.pending_mut(id) {
            Ok(record) => {
                record.status = to;
                record.updated_at = at;
                record.clone()
            }
            Err(outcome) => return Ok(outcome),
        };
        inner.audit.extend(audit);
        Ok(Transition::Committed(committed))
    }

    async fn audit_log(&self, id: &RecordId) -> Result<Vec<AuditEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .audit
            .iter()
            .filter(|e| &e.record_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domverify_core::{Actor, AdminId, AuditAction, Method};
    use tokio_test::{assert_err, assert_ok};

    fn entry(id: &str) -> AuditEntry {
        AuditEntry {
            record_id: RecordId::new(id),
            actor: Actor::Admin(AdminId::new("root")),
            action: AuditAction::Approved,
            reason: None,
            at: Utc::now(),
        }
    }

    fn record(id: &str, domain: &str) -> VerificationRecord {
        VerificationRecord::pending(
            RecordId::new(id),
            DomainId::new(domain),
            Method::Dns,
            format!("_domainverify.{domain}."),
            format!("token-{id}"),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = MemoryStore::new();
        assert_ok!(store.insert(record("r1", "a.com")).await);

        let fetched = store.get(&RecordId::new("r1")).await.unwrap().unwrap();
        assert_eq!(fetched.expected_value, "token-r1");
        assert!(store.get(&RecordId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = MemoryStore::new();
        assert_ok!(store.insert(record("r1", "a.com")).await);
        assert_err!(store.insert(record("r1", "b.com")).await);
    }

    #[tokio::test]
    async fn history_is_most_recent_first() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        store.insert(record("r2", "b.com")).await.unwrap();
        store.insert(record("r3", "a.com")).await.unwrap();

        let domain = DomainId::new("a.com");
        let ids: Vec<String> = store
            .history(&domain)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["r3", "r1"]);
        assert_eq!(
            store.latest(&domain).await.unwrap().unwrap().id,
            RecordId::new("r3")
        );
    }

    #[tokio::test]
    async fn begin_attempt_counts_only_pending() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        let id = RecordId::new("r1");

        let Transition::Committed(updated) = store.begin_attempt(&id, Utc::now()).await.unwrap()
        else {
            panic!("expected commit");
        };
        assert_eq!(updated.attempts, 1);
        assert!(updated.last_checked_at.is_some());

        store.transition(&id, Status::Verified, Utc::now(), None).await.unwrap();
        assert_eq!(
            store.begin_attempt(&id, Utc::now()).await.unwrap(),
            Transition::Conflict(Status::Verified)
        );
        assert_eq!(
            store
                .begin_attempt(&RecordId::new("ghost"), Utc::now())
                .await
                .unwrap(),
            Transition::Missing
        );
    }

    #[tokio::test]
    async fn terminal_transition_happens_once() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        let id = RecordId::new("r1");

        let first = store
            .transition(&id, Status::Rejected, Utc::now(), Some(entry("r1")))
            .await
            .unwrap();
        assert!(matches!(first, Transition::Committed(ref r) if r.status == Status::Rejected));

        let second = store.transition(&id, Status::Verified, Utc::now(), None).await.unwrap();
        assert_eq!(second, Transition::Conflict(Status::Rejected));
        assert_eq!(
            store.get(&id).await.unwrap().unwrap().status,
            Status::Rejected
        );
        // Only the committed transition left an audit entry.
        assert_eq!(store.audit_log(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transition_back_to_pending_is_refused() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        assert_err!(
            store
                .transition(&RecordId::new("r1"), Status::Pending, Utc::now(), None)
                .await
        );
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        store.insert(record("r2", "b.com")).await.unwrap();
        store
            .transition(&RecordId::new("r2"), Status::Verified, Utc::now(), None)
            .await
            .unwrap();

        assert_eq!(store.list(None).await.unwrap().len(), 2);
        let pending = store.list(Some(Status::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, RecordId::new("r1"));
    }

    #[tokio::test]
    async fn audit_log_is_per_record() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        store.insert(record("r2", "b.com")).await.unwrap();
        for id in ["r1", "r2"] {
            store
                .transition(&RecordId::new(id), Status::Verified, Utc::now(), Some(entry(id)))
                .await
                .unwrap();
        }

        let log = store.audit_log(&RecordId::new("r1")).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].record_id, RecordId::new("r1"));
    }

    #[tokio::test]
    async fn audit_entry_for_another_record_is_refused() {
        let store = MemoryStore::new();
        store.insert(record("r1", "a.com")).await.unwrap();
        let id = RecordId::new("r1");

        assert_err!(
            store
                .transition(&id, Status::Rejected, Utc::now(), Some(entry("r2")))
                .await
        );
        assert!(store.get(&id).await.unwrap().unwrap().is_pending());
        assert!(store.audit_log(&id).await.unwrap().is_empty());
    }
}
