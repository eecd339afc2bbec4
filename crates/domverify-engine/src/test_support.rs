//! In-memory collaborators and a scripted resolver for engine tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domverify_core::{
    AdminId, AuditEntry, DomainId, RecordId, Result, Status, UserId, VerificationRecord,
    VerifyError,
};
use domverify_resolver::{ConsensusChecker, ResolverError, ResolverResult, RetryConfig, TxtResolver};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    AdminQueue, Collaborators, EngineConfig, IdentityProvider, ListingStore, MemoryStore,
    Notifier, NotifyEvent, Orchestrator, RecordStore, Transition,
};

#[derive(Default)]
pub struct FakeIdentity {
    owners: Mutex<HashSet<(UserId, DomainId)>>,
    admins: Mutex<HashSet<AdminId>>,
}

impl FakeIdentity {
    pub fn grant(&self, user: &UserId, domain: &DomainId) {
        self.owners
            .lock()
            .unwrap()
            .insert((user.clone(), domain.clone()));
    }

    pub fn promote(&self, admin: &AdminId) {
        self.admins.lock().unwrap().insert(admin.clone());
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn is_owner(&self, user: &UserId, domain: &DomainId) -> Result<bool> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .contains(&(user.clone(), domain.clone())))
    }

    async fn is_admin(&self, admin: &AdminId) -> Result<bool> {
        Ok(self.admins.lock().unwrap().contains(admin))
    }
}

#[derive(Default)]
pub struct FakeListings {
    names: Mutex<HashMap<DomainId, String>>,
    statuses: Mutex<HashMap<DomainId, Status>>,
    updates: AtomicUsize,
    failing: AtomicBool,
}

impl FakeListings {
    pub fn add(&self, domain: &DomainId, name: &str) {
        self.names
            .lock()
            .unwrap()
            .insert(domain.clone(), name.to_string());
    }

    pub fn remove(&self, domain: &DomainId) {
        self.names.lock().unwrap().remove(domain);
    }

    pub fn status(&self, domain: &DomainId) -> Option<Status> {
        self.statuses.lock().unwrap().get(domain).copied()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn fail_updates(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingStore for FakeListings {
    async fn listing_name(&self, domain: &DomainId) -> Result<Option<String>> {
        Ok(self.names.lock().unwrap().get(domain).cloned())
    }

    async fn set_verification_status(&self, domain: &DomainId, status: Status) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(VerifyError::Listing("listing database unavailable".into()));
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.statuses.lock().unwrap().insert(domain.clone(), status);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(DomainId, NotifyEvent)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(DomainId, NotifyEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_owner(&self, domain: &DomainId, event: NotifyEvent) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(VerifyError::Io(std::io::Error::other("smtp down")));
        }
        self.events.lock().unwrap().push((domain.clone(), event));
        Ok(())
    }
}

/// [`MemoryStore`] whose writes can be made to fail, like a database
/// that drops the connection. A failed write changes nothing.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_inserts: AtomicBool,
    failing_audit: AtomicBool,
}

impl FlakyStore {
    pub fn fail_inserts(&self, fail: bool) {
        self.failing_inserts.store(fail, Ordering::SeqCst);
    }

    /// Fail every transition that carries an audit entry.
    pub fn fail_audit_writes(&self, fail: bool) {
        self.failing_audit.store(fail, Ordering::SeqCst);
    }
}

fn unavailable() -> VerifyError {
    VerifyError::Store("record database unavailable".into())
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn insert(&self, record: VerificationRecord) -> Result<()> {
        if self.failing_inserts.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.insert(record).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<VerificationRecord>> {
        self.inner.get(id).await
    }

    async fn list(&self, status: Option<Status>) -> Result<Vec<VerificationRecord>> {
        self.inner.list(status).await
    }

    async fn history(&self, domain: &DomainId) -> Result<Vec<VerificationRecord>> {
        self.inner.history(domain).await
    }

    async fn begin_attempt(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Transition> {
        self.inner.begin_attempt(id, at).await
    }

    async fn transition(
        &self,
        id: &RecordId,
        to: Status,
        at: DateTime<Utc>,
        audit: Option<AuditEntry>,
    ) -> Result<Transition> {
        if audit.is_some() && self.failing_audit.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.transition(id, to, at, audit).await
    }

    async fn audit_log(&self, id: &RecordId) -> Result<Vec<AuditEntry>> {
        self.inner.audit_log(id).await
    }
}

/// Resolver whose answer can be changed mid-test to simulate propagation.
#[derive(Default)]
pub struct StaticResolver {
    records: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl StaticResolver {
    pub fn publish(&self, values: &[&str]) {
        *self.records.lock().unwrap() = values.iter().map(ToString::to_string).collect();
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TxtResolver for StaticResolver {
    fn name(&self) -> &str {
        "static"
    }

    async fn query_txt(&self, _host: &str) -> ResolverResult<Vec<String>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ResolverError::Dns("network unreachable".into()));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub admin: AdminQueue,
    pub store: Arc<FlakyStore>,
    pub identity: Arc<FakeIdentity>,
    pub listings: Arc<FakeListings>,
    pub notifier: Arc<RecordingNotifier>,
    pub resolver: Arc<StaticResolver>,
    pub owner: UserId,
    pub domain: DomainId,
    pub admin_id: AdminId,
}

impl Harness {
    /// One owner, one listing (`example.com`), one admin.
    pub fn new() -> Self {
        let store = Arc::new(FlakyStore::default());
        let identity = Arc::new(FakeIdentity::default());
        let listings = Arc::new(FakeListings::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = Arc::new(StaticResolver::default());

        let collab = Collaborators {
            store: store.clone(),
            identity: identity.clone(),
            listings: listings.clone(),
            notifier: notifier.clone(),
        };
        let checker = ConsensusChecker::new(vec![resolver.clone() as Arc<dyn TxtResolver>])
            .with_retry(RetryConfig::none());

        let owner = UserId::new("alice");
        let domain = DomainId::new("listing-1");
        let admin_id = AdminId::new("root");
        identity.grant(&owner, &domain);
        identity.promote(&admin_id);
        listings.add(&domain, "Example.com");

        Self {
            orchestrator: Orchestrator::new(
                collab.clone(),
                Arc::new(checker),
                &EngineConfig::default(),
            ),
            admin: AdminQueue::new(collab),
            store,
            identity,
            listings,
            notifier,
            resolver,
            owner,
            domain,
            admin_id,
        }
    }

    /// Add another listing owned by the default owner.
    pub fn add_listing(&self, id: &str, name: &str) -> DomainId {
        let domain = DomainId::new(id);
        self.listings.add(&domain, name);
        self.identity.grant(&self.owner, &domain);
        domain
    }
}
