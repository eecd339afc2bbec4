//! Interfaces to the systems around the engine: identity, listings and
//! notification delivery.

use async_trait::async_trait;
use domverify_core::{
    AdminId, DomainId, Instructions, Result, Status, UserId, VerificationRecord,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::store::RecordStore;

/// Ownership and role checks
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Does `user` own the listing `domain`?
    async fn is_owner(&self, user: &UserId, domain: &DomainId) -> Result<bool>;

    /// May `admin` act through the review queue?
    async fn is_admin(&self, admin: &AdminId) -> Result<bool>;
}

/// The listing store, owner of the `verification_status` mirror
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Domain name of a listing, `None` if the listing does not exist
    async fn listing_name(&self, domain: &DomainId) -> Result<Option<String>>;

    /// Mirror the latest record's terminal status onto the listing
    async fn set_verification_status(&self, domain: &DomainId, status: Status) -> Result<()>;
}

/// Events delivered to the domain owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    /// Ownership proven
    Verified,
    /// Verification rejected
    Rejected,
    /// Publishing instructions re-sent on request
    Instructions(Instructions),
}

/// Owner notification dispatch. Failures are logged by the engine and
/// never undo or block a transition.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `event` to the owner of `domain`
    async fn notify_owner(&self, domain: &DomainId, event: NotifyEvent) -> Result<()>;
}

/// Everything the orchestrator and the review queue share.
#[derive(Clone)]
pub struct Collaborators {
    /// Verification record persistence
    pub store: Arc<dyn RecordStore>,
    /// Ownership and admin checks
    pub identity: Arc<dyn IdentityProvider>,
    /// Listing names and verification mirror
    pub listings: Arc<dyn ListingStore>,
    /// Owner notifications
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Side effects of a committed terminal transition: sync the listing
    /// mirror (only when the record is the domain's newest) and notify the
    /// owner. Errors here are logged, the transition stands.
    pub(crate) async fn after_terminal(&self, record: &VerificationRecord) {
        let event = match record.status {
            Status::Verified => NotifyEvent::Verified,
            Status::Rejected => NotifyEvent::Rejected,
            Status::Pending => return,
        };

        match self.store.latest(&record.domain_id).await {
            Ok(Some(latest)) if latest.id == record.id => {
                if let Err(e) = self
                    .listings
                    .set_verification_status(&record.domain_id, record.status)
                    .await
                {
                    error!(
                        record_id = %record.id,
                        domain_id = %record.domain_id,
                        error = %e,
                        "failed to update listing verification status"
                    );
                }
            }
            Ok(_) => debug!(
                record_id = %record.id,
                "record is not the newest for its domain, listing left untouched"
            ),
            Err(e) => error!(record_id = %record.id, error = %e, "failed to load latest record"),
        }

        self.notify(&record.domain_id, event).await;
    }

    /// Fire-and-forget notification
    pub(crate) async fn notify(&self, domain: &DomainId, event: NotifyEvent) {
        if let Err(e) = self.notifier.notify_owner(domain, event).await {
            warn!(domain_id = %domain, error = %e, "owner notification failed");
        }
    }
}
