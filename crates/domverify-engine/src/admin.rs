//! Admin review queue: manual approve/reject of pending records.
//!
//! The acting administrator is an explicit argument on every call. There
//! is no ambient admin session.

use chrono::Utc;
use domverify_core::{
    Actor, AdminId, AuditAction, AuditEntry, RecordId, Result, ReviewEntry, Status,
    VerificationRecord, VerifyError,
};
use tracing::{info, instrument, warn};

use crate::collaborators::Collaborators;
use crate::store::Transition;

/// Human-in-the-loop override surface
pub struct AdminQueue {
    collab: Collaborators,
}

impl AdminQueue {
    /// Create a review queue over the shared collaborators
    #[must_use]
    pub const fn new(collab: Collaborators) -> Self {
        Self { collab }
    }

    /// Records for review, oldest first, joined with their listing name
    #[instrument(skip_all, fields(admin = %admin, status = ?status))]
    pub async fn list(&self, admin: &AdminId, status: Option<Status>) -> Result<Vec<ReviewEntry>> {
        self.authorize(admin).await?;

        let records = self.collab.store.list(status).await?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let listing_name = match self.collab.listings.listing_name(&record.domain_id).await {
                Ok(name) => name,
                Err(e) => {
                    warn!(domain_id = %record.domain_id, error = %e, "listing lookup failed");
                    None
                }
            };
            entries.push(ReviewEntry {
                record,
                listing_name,
            });
        }
        Ok(entries)
    }

    /// Force `verified`, whatever DNS currently says
    pub async fn approve(
        &self,
        admin: &AdminId,
        id: &RecordId,
        reason: Option<String>,
    ) -> Result<VerificationRecord> {
        self.decide(admin, id, Status::Verified, reason).await
    }

    /// Force `rejected`, even if the TXT record is in place
    pub async fn reject(
        &self,
        admin: &AdminId,
        id: &RecordId,
        reason: Option<String>,
    ) -> Result<VerificationRecord> {
        self.decide(admin, id, Status::Rejected, reason).await
    }

    /// Persisted audit trail of a record
    pub async fn audit_log(&self, admin: &AdminId, id: &RecordId) -> Result<Vec<AuditEntry>> {
        self.authorize(admin).await?;
        if self.collab.store.get(id).await?.is_none() {
            return Err(VerifyError::record_not_found(id));
        }
        self.collab.store.audit_log(id).await
    }

    #[instrument(skip_all, fields(admin = %admin, record_id = %id, to = %to))]
    async fn decide(
        &self,
        admin: &AdminId,
        id: &RecordId,
        to: Status,
        reason: Option<String>,
    ) -> Result<VerificationRecord> {
        self.authorize(admin).await?;

        let action = if to == Status::Verified {
            AuditAction::Approved
        } else {
            AuditAction::Rejected
        };
        let audit = AuditEntry {
            record_id: id.clone(),
            actor: Actor::Admin(admin.clone()),
            action,
            reason: reason.clone(),
            at: Utc::now(),
        };
        let record = match self.collab.store.transition(id, to, audit.at, Some(audit)).await? {
            Transition::Committed(record) => record,
            Transition::Conflict(status) => {
                return Err(VerifyError::AlreadyTerminal {
                    id: id.clone(),
                    status,
                })
            }
            Transition::Missing => return Err(VerifyError::record_not_found(id)),
        };

        info!(
            domain_id = %record.domain_id,
            action = ?action,
            reason = reason.as_deref().unwrap_or(""),
            "admin decision recorded"
        );

        self.collab.after_terminal(&record).await;
        Ok(record)
    }

    async fn authorize(&self, admin: &AdminId) -> Result<()> {
        if self.collab.identity.is_admin(admin).await? {
            Ok(())
        } else {
            Err(VerifyError::NotAdmin(admin.to_string()))
        }
    }
}
