//! Start, check and resend operations for domain owners.

use chrono::Utc;
use domverify_core::{
    Actor, AuditAction, AuditEntry, CheckResponse, DomainId, Method, RecordId, Result,
    StartResponse, Status, UserId, VerificationRecord, VerifyError,
};
use domverify_resolver::{record_host, ConsensusChecker};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::collaborators::{Collaborators, NotifyEvent};
use crate::config::EngineConfig;
use crate::store::Transition;
use crate::token::TokenGenerator;

/// Drives verification records through their lifecycle.
///
/// Checks are single caller-invoked operations. Polling or backoff
/// between checks is the caller's (or a scheduler's) business.
pub struct Orchestrator {
    collab: Collaborators,
    checker: Arc<ConsensusChecker>,
    tokens: TokenGenerator,
    host_label: String,
}

impl Orchestrator {
    /// Create an orchestrator
    #[must_use]
    pub fn new(collab: Collaborators, checker: Arc<ConsensusChecker>, config: &EngineConfig) -> Self {
        Self {
            collab,
            checker,
            tokens: TokenGenerator::new(config.token_bytes),
            host_label: config.record_host_label.clone(),
        }
    }

    /// Begin verifying `domain` for `user`.
    ///
    /// The new record is persisted first. Only then is any older pending
    /// record of the domain superseded (rejected), so only the newest
    /// record can ever be checked into `verified` and a failed start
    /// leaves the previous record usable.
    #[instrument(skip_all, fields(user = %user, domain_id = %domain, method = %method))]
    pub async fn start(
        &self,
        user: &UserId,
        domain: &DomainId,
        method: Method,
    ) -> Result<StartResponse> {
        if !method.is_supported() {
            return Err(VerifyError::UnsupportedMethod(method));
        }
        if !self.collab.identity.is_owner(user, domain).await? {
            return Err(VerifyError::NotOwner {
                user: user.to_string(),
                domain: domain.to_string(),
            });
        }

        let name = self
            .collab
            .listings
            .listing_name(domain)
            .await?
            .ok_or_else(|| VerifyError::NotFound {
                resource: format!("listing {domain}"),
            })?;

        let now = Utc::now();
        let record = VerificationRecord::pending(
            self.tokens.record_id()?,
            domain.clone(),
            method,
            record_host(&self.host_label, &name),
            self.tokens.token()?,
            now,
        );
        self.collab.store.insert(record.clone()).await?;

        for stale in self.collab.store.history(domain).await? {
            if !stale.is_pending() || stale.id == record.id {
                continue;
            }
            let audit = AuditEntry {
                record_id: stale.id.clone(),
                actor: Actor::User(user.clone()),
                action: AuditAction::Superseded,
                reason: Some("superseded by a new verification".into()),
                at: now,
            };
            if let Transition::Committed(_) = self
                .collab
                .store
                .transition(&stale.id, Status::Rejected, now, Some(audit))
                .await?
            {
                info!(record_id = %stale.id, "superseded pending verification");
            }
        }

        info!(record_id = %record.id, host = %record.host, "verification started");
        Ok(StartResponse::from(&record))
    }

    /// Run one automated check of a pending record.
    ///
    /// A failed check is a successful call with `verified: false`; the
    /// record stays `pending`. Returns [`VerifyError::AlreadyTerminal`] if
    /// the record left `pending` before or during the check.
    #[instrument(skip_all, fields(record_id = %id))]
    pub async fn check(&self, id: &RecordId) -> Result<CheckResponse> {
        let record = self.pending_record(id).await?;

        let record = match self.collab.store.begin_attempt(&record.id, Utc::now()).await? {
            Transition::Committed(record) => record,
            Transition::Conflict(status) => return Err(already_terminal(id, status)),
            Transition::Missing => return Err(VerifyError::record_not_found(id)),
        };

        let report = self
            .checker
            .check(&record.host, &record.expected_value)
            .await;
        let message = report.message();

        if !report.verified {
            info!(
                attempts = record.attempts,
                diagnosis = ?report.diagnosis,
                "verification still pending"
            );
            return Ok(CheckResponse {
                verified: false,
                message,
                diagnostics: report.into_diagnostics(),
            });
        }

        match self
            .collab
            .store
            .transition(id, Status::Verified, Utc::now(), None)
            .await?
        {
            Transition::Committed(record) => {
                info!(domain_id = %record.domain_id, attempts = record.attempts, "domain verified");
                self.collab.after_terminal(&record).await;
                Ok(CheckResponse {
                    verified: true,
                    message,
                    diagnostics: report.into_diagnostics(),
                })
            }
            Transition::Conflict(status) => {
                warn!(%status, "record decided concurrently, discarding check result");
                Err(already_terminal(id, status))
            }
            Transition::Missing => Err(VerifyError::record_not_found(id)),
        }
    }

    /// Re-deliver the original instructions. The token is never
    /// regenerated: the owner may already have published it.
    #[instrument(skip_all, fields(record_id = %id))]
    pub async fn resend(&self, id: &RecordId) -> Result<StartResponse> {
        let record = self.pending_record(id).await?;
        let response = StartResponse::from(&record);
        self.collab
            .notify(
                &record.domain_id,
                NotifyEvent::Instructions(response.instructions.clone()),
            )
            .await;
        Ok(response)
    }

    /// Owner gives up on a pending record.
    #[instrument(skip_all, fields(user = %user, record_id = %id))]
    pub async fn abandon(
        &self,
        user: &UserId,
        id: &RecordId,
        reason: Option<String>,
    ) -> Result<VerificationRecord> {
        let record = self
            .collab
            .store
            .get(id)
            .await?
            .ok_or_else(|| VerifyError::record_not_found(id))?;

        if !self.collab.identity.is_owner(user, &record.domain_id).await? {
            return Err(VerifyError::NotOwner {
                user: user.to_string(),
                domain: record.domain_id.to_string(),
            });
        }

        let audit = AuditEntry {
            record_id: id.clone(),
            actor: Actor::User(user.clone()),
            action: AuditAction::Abandoned,
            reason: reason.clone(),
            at: Utc::now(),
        };
        let record = match self
            .collab
            .store
            .transition(id, Status::Rejected, audit.at, Some(audit))
            .await?
        {
            Transition::Committed(record) => record,
            Transition::Conflict(status) => return Err(already_terminal(id, status)),
            Transition::Missing => return Err(VerifyError::record_not_found(id)),
        };

        info!(reason = reason.as_deref().unwrap_or(""), "verification abandoned");

        self.collab.after_terminal(&record).await;
        Ok(record)
    }

    /// Fetch a record
    pub async fn record(&self, id: &RecordId) -> Result<VerificationRecord> {
        self.collab
            .store
            .get(id)
            .await?
            .ok_or_else(|| VerifyError::record_not_found(id))
    }

    /// All records of a domain, most recent first
    pub async fn history(&self, domain: &DomainId) -> Result<Vec<VerificationRecord>> {
        self.collab.store.history(domain).await
    }

    /// Re-mirror the newest record's terminal status onto the listing.
    /// Returns the mirrored status, `None` if nothing terminal to mirror.
    #[instrument(skip_all, fields(domain_id = %domain))]
    pub async fn sync_listing(&self, domain: &DomainId) -> Result<Option<Status>> {
        let Some(latest) = self.collab.store.latest(domain).await? else {
            return Ok(None);
        };
        if !latest.status.is_terminal() {
            return Ok(None);
        }
        self.collab
            .listings
            .set_verification_status(domain, latest.status)
            .await?;
        Ok(Some(latest.status))
    }

    async fn pending_record(&self, id: &RecordId) -> Result<VerificationRecord> {
        let record = self
            .collab
            .store
            .get(id)
            .await?
            .ok_or_else(|| VerifyError::record_not_found(id))?;
        if record.is_pending() {
            Ok(record)
        } else {
            Err(already_terminal(id, record.status))
        }
    }
}

fn already_terminal(id: &RecordId, status: Status) -> VerifyError {
    VerifyError::AlreadyTerminal {
        id: id.clone(),
        status,
    }
}
