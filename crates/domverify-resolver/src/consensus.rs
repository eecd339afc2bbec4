//! Fan-out TXT lookups and merge them into a single verdict.

use domverify_core::{Diagnosis, Diagnostics, ResolverOutcome};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ResolverSettings, RetryConfig};
use crate::doh::DohResolver;
use crate::error::ResolverResult;
use crate::name::normalize_record_name;
use crate::system::SystemResolver;
use crate::TxtResolver;

/// Default budget for one resolver
const DEFAULT_PER_RESOLVER_TIMEOUT: Duration = Duration::from_secs(4);

/// Default budget for the whole fan-out
const DEFAULT_OVERALL_TIMEOUT: Duration = Duration::from_secs(7);

/// Merged result of one consensus check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusReport {
    /// Normalized name that was queried
    pub record_name: String,

    /// Token that was looked for
    pub expected_value: String,

    /// True iff `expected_value` is a literal member of `found`
    pub verified: bool,

    /// Union of TXT values from every resolver, deduplicated and sorted
    pub found: Vec<String>,

    /// Outcome per resolver name
    pub per_resolver: BTreeMap<String, ResolverOutcome>,

    /// Why the check passed or failed
    pub diagnosis: Diagnosis,
}

impl ConsensusReport {
    /// Human-actionable message for the domain owner
    #[must_use]
    pub fn message(&self) -> String {
        self.diagnosis.message()
    }

    /// Number of resolvers that answered (including empty answers)
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.per_resolver.values().filter(|o| o.answered()).count()
    }

    /// Detach the per-resolver detail for an API response
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        Diagnostics {
            per_resolver: self.per_resolver,
            found: self.found,
        }
    }
}

/// Queries every configured resolver concurrently and decides pass/fail
/// against an expected token.
///
/// Resolver names are used as diagnostics keys and should be unique.
pub struct ConsensusChecker {
    resolvers: Vec<Arc<dyn TxtResolver>>,
    per_resolver_timeout: Duration,
    overall_timeout: Duration,
    retry: RetryConfig,
}

impl ConsensusChecker {
    /// Create a checker over the given resolvers with default budgets
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn TxtResolver>>) -> Self {
        Self {
            resolvers,
            per_resolver_timeout: DEFAULT_PER_RESOLVER_TIMEOUT,
            overall_timeout: DEFAULT_OVERALL_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    /// Build the standard resolver set described by `settings`:
    /// the local stub resolver plus every configured DoH endpoint.
    pub fn from_settings(settings: &ResolverSettings) -> ResolverResult<Self> {
        settings.validate()?;

        let mut resolvers: Vec<Arc<dyn TxtResolver>> = Vec::new();
        if settings.system {
            resolvers.push(Arc::new(SystemResolver::new()?));
        }
        for endpoint in &settings.doh {
            let doh = DohResolver::builder(&endpoint.name, &endpoint.url)
                .timeout(settings.per_resolver_timeout())
                .build()?;
            resolvers.push(Arc::new(doh));
        }

        Ok(Self::new(resolvers)
            .with_timeouts(settings.per_resolver_timeout(), settings.overall_timeout())
            .with_retry(settings.retry.clone()))
    }

    /// Set the per-resolver and overall budgets
    #[must_use]
    pub const fn with_timeouts(mut self, per_resolver: Duration, overall: Duration) -> Self {
        self.per_resolver_timeout = per_resolver;
        self.overall_timeout = overall;
        self
    }

    /// Set the per-resolver retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Names of the configured resolvers
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Run one consensus check.
    ///
    /// Never fails: resolver errors and timeouts are recorded in
    /// `per_resolver`. Dropping the returned future aborts every
    /// outstanding query and nothing is committed.
    pub async fn check(&self, record_name: &str, expected_value: &str) -> ConsensusReport {
        let host = normalize_record_name(record_name);
        debug!(host = %host, resolvers = self.resolvers.len(), "starting consensus check");

        let mut tasks = JoinSet::new();
        for resolver in &self.resolvers {
            let resolver = Arc::clone(resolver);
            let host = host.clone();
            let retry = self.retry.clone();
            let budget = self.per_resolver_timeout;

            tasks.spawn(async move {
                let name = resolver.name().to_string();
                let outcome =
                    match tokio::time::timeout(budget, query_with_retry(&*resolver, &host, &retry))
                        .await
                    {
                        Ok(Ok(records)) => ResolverOutcome::Answered { records },
                        Ok(Err(e)) => ResolverOutcome::Failed {
                            error: e.to_string(),
                        },
                        Err(_) => ResolverOutcome::TimedOut,
                    };
                (name, outcome)
            });
        }

        let mut per_resolver = BTreeMap::new();
        let deadline = Instant::now() + self.overall_timeout;
        let mut deadline_hit = false;

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((name, outcome)))) => {
                    per_resolver.insert(name, outcome);
                }
                Ok(Some(Err(e))) => warn!(error = %e, "resolver task failed"),
                Ok(None) => break,
                Err(_) => {
                    warn!(host = %host, "consensus check hit overall timeout");
                    deadline_hit = true;
                    break;
                }
            }
        }
        tasks.abort_all();

        for resolver in &self.resolvers {
            per_resolver
                .entry(resolver.name().to_string())
                .or_insert_with(|| {
                    if deadline_hit {
                        ResolverOutcome::TimedOut
                    } else {
                        ResolverOutcome::Failed {
                            error: "resolver task aborted".into(),
                        }
                    }
                });
        }

        let report = aggregate(host, expected_value, per_resolver);
        info!(
            host = %report.record_name,
            verified = report.verified,
            diagnosis = ?report.diagnosis,
            answered = report.answered_count(),
            "consensus check finished"
        );
        report
    }
}

/// Retry a resolver's retryable failures with backoff. The caller bounds
/// the whole loop with the per-resolver timeout.
async fn query_with_retry(
    resolver: &dyn TxtResolver,
    host: &str,
    retry: &RetryConfig,
) -> ResolverResult<Vec<String>> {
    let mut attempt = 0;
    loop {
        match resolver.query_txt(host).await {
            Ok(records) => return Ok(records),
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                let backoff = retry.backoff_for(attempt);
                debug!(
                    resolver = resolver.name(),
                    error = %e,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying resolver"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn aggregate(
    record_name: String,
    expected_value: &str,
    per_resolver: BTreeMap<String, ResolverOutcome>,
) -> ConsensusReport {
    let found: BTreeSet<String> = per_resolver
        .values()
        .flat_map(|o| o.records().iter().cloned())
        .collect();

    let verified = found.contains(expected_value);
    let diagnosis = if verified {
        Diagnosis::Verified
    } else if !found.is_empty() {
        Diagnosis::ValueMismatch
    } else if per_resolver.values().any(ResolverOutcome::answered) {
        Diagnosis::NoRecord
    } else {
        Diagnosis::Unreachable
    };

    ConsensusReport {
        record_name,
        expected_value: expected_value.to_string(),
        verified,
        found: found.into_iter().collect(),
        per_resolver,
        diagnosis,
    }
}
