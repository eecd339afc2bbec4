//! Verification record persistence.
//!
//! The record row is the only shared mutable resource of the engine.
//! Every mutation goes through a conditional update that only applies
//! while the record is still `pending`, so concurrent checks and admin
//! decisions need no lock of their own.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domverify_core::{AuditEntry, DomainId, RecordId, Result, Status, VerificationRecord};

/// Outcome of a conditional update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Update applied; the record as stored afterwards
    Committed(VerificationRecord),
    /// Record had already left `pending`; its current status
    Conflict(Status),
    /// No such record
    Missing,
}

/// Storage backend for verification records and their audit trail.
///
/// Records are never deleted.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record. Fails if the id already exists.
    async fn insert(&self, record: VerificationRecord) -> Result<()>;

    /// Fetch a record by id
    async fn get(&self, id: &RecordId) -> Result<Option<VerificationRecord>>;

    /// All records, oldest first, optionally filtered by status
    async fn list(&self, status: Option<Status>) -> Result<Vec<VerificationRecord>>;

    /// Records of one domain, most recent first
    async fn history(&self, domain: &DomainId) -> Result<Vec<VerificationRecord>>;

    /// The authoritative (newest) record of a domain
    async fn latest(&self, domain: &DomainId) -> Result<Option<VerificationRecord>> {
        Ok(self.history(domain).await?.into_iter().next())
    }

    /// Atomically: if the record is `pending`, increment `attempts` and
    /// stamp `last_checked_at`.
    async fn begin_attempt(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Transition>;

    /// Atomically: if the record is `pending`, move it to the terminal
    /// status `to` and append `audit` to the trail. Either both are
    /// persisted or neither is; on `Conflict` or `Missing` nothing is
    /// written.
    async fn transition(
        &self,
        id: &RecordId,
        to: Status,
        at: DateTime<Utc>,
        audit: Option<AuditEntry>,
    ) -> Result<Transition>;

    /// Audit trail of one record, oldest first
    async fn audit_log(&self, id: &RecordId) -> Result<Vec<AuditEntry>>;
}
