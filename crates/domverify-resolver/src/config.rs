//! Resolver configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::doh::{CLOUDFLARE_DOH_URL, GOOGLE_DOH_URL};
use crate::error::{ResolverError, ResolverResult};

/// Retry policy for a single resolver within one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first query
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }

    /// Disable retries
    #[must_use]
    pub const fn none() -> Self {
        Self::new().max_retries(0)
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff_ms = duration.as_millis() as u64;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff_ms = duration.as_millis() as u64;
        self
    }

    /// Calculate backoff for a given attempt
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let backoff = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(backoff.min(self.max_backoff_ms))
    }
}

/// A DNS-over-HTTPS endpoint speaking the JSON API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DohEndpoint {
    /// Diagnostics name
    pub name: String,

    /// Endpoint URL, queried as `?name=<host>&type=TXT`
    pub url: String,
}

/// Which resolvers a consensus check fans out to, and their budgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Budget for one resolver, retries included
    #[serde(default = "default_per_resolver_timeout_ms")]
    pub per_resolver_timeout_ms: u64,

    /// Budget for the whole fan-out
    #[serde(default = "default_overall_timeout_ms")]
    pub overall_timeout_ms: u64,

    /// Include the local stub resolver
    #[serde(default = "default_true")]
    pub system: bool,

    /// Independent public DoH resolvers
    #[serde(default = "default_doh_endpoints")]
    pub doh: Vec<DohEndpoint>,

    /// Per-resolver retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            per_resolver_timeout_ms: default_per_resolver_timeout_ms(),
            overall_timeout_ms: default_overall_timeout_ms(),
            system: true,
            doh: default_doh_endpoints(),
            retry: RetryConfig::default(),
        }
    }
}

impl ResolverSettings {
    /// Per-resolver budget as a [`Duration`]
    #[must_use]
    pub const fn per_resolver_timeout(&self) -> Duration {
        Duration::from_millis(self.per_resolver_timeout_ms)
    }

    /// Overall fan-out budget as a [`Duration`]
    #[must_use]
    pub const fn overall_timeout(&self) -> Duration {
        Duration::from_millis(self.overall_timeout_ms)
    }

    /// Reject settings that could never produce a useful check.
    pub fn validate(&self) -> ResolverResult<()> {
        if !self.system && self.doh.is_empty() {
            return Err(ResolverError::Config(
                "at least one resolver must be configured".into(),
            ));
        }
        if self.per_resolver_timeout_ms == 0 {
            return Err(ResolverError::Config(
                "per_resolver_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.overall_timeout_ms < self.per_resolver_timeout_ms {
            return Err(ResolverError::Config(format!(
                "overall_timeout_ms ({}) must be >= per_resolver_timeout_ms ({})",
                self.overall_timeout_ms, self.per_resolver_timeout_ms
            )));
        }
        for endpoint in &self.doh {
            url::Url::parse(&endpoint.url).map_err(|e| {
                ResolverError::Config(format!("invalid DoH url for {}: {e}", endpoint.name))
            })?;
        }
        Ok(())
    }
}

// Default value functions for serde.
const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    200
}

const fn default_max_backoff_ms() -> u64 {
    1_000
}

const fn default_per_resolver_timeout_ms() -> u64 {
    4_000
}

const fn default_overall_timeout_ms() -> u64 {
    7_000
}

const fn default_true() -> bool {
    true
}

fn default_doh_endpoints() -> Vec<DohEndpoint> {
    vec![
        DohEndpoint {
            name: "google".into(),
            url: GOOGLE_DOH_URL.into(),
        },
        DohEndpoint {
            name: "cloudflare".into(),
            url: CLOUDFLARE_DOH_URL.into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let retry = RetryConfig::new()
            .initial_backoff(Duration::from_millis(100))
            .max_backoff(Duration::from_millis(350));
        assert_eq!(retry.backoff_for(0), Duration::from_millis(100));
        assert_eq!(retry.backoff_for(1), Duration::from_millis(200));
        assert_eq!(retry.backoff_for(2), Duration::from_millis(350));
        assert_eq!(retry.backoff_for(40), Duration::from_millis(350));
    }

    #[test]
    fn default_settings_fan_out_to_three_resolvers() {
        let settings = ResolverSettings::default();
        assert!(settings.system);
        assert_eq!(settings.doh.len(), 2);
        assert!(settings.validate().is_ok());
        assert!(settings.overall_timeout() > settings.per_resolver_timeout());
    }

    #[test]
    fn rejects_inverted_timeouts() {
        let settings = ResolverSettings {
            per_resolver_timeout_ms: 5_000,
            overall_timeout_ms: 1_000,
            ..ResolverSettings::default()
        };
        assert!(matches!(settings.validate(), Err(ResolverError::Config(_))));
    }

    #[test]
    fn rejects_empty_resolver_set() {
        let settings = ResolverSettings {
            system: false,
            doh: Vec::new(),
            ..ResolverSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn partial_settings_use_defaults() {
        let settings: ResolverSettings =
            serde_json::from_str(r#"{"system": false, "retry": {"max_retries": 0}}"#).unwrap();
        assert!(!settings.system);
        assert_eq!(settings.doh.len(), 2);
        assert_eq!(settings.retry.max_retries, 0);
        assert_eq!(settings.retry.initial_backoff_ms, 200);
        assert_eq!(settings.per_resolver_timeout_ms, 4_000);
    }
}
