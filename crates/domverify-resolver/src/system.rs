//! Local stub resolver backend.

use async_trait::async_trait;
use hickory_resolver::config::ResolverOpts;
use hickory_resolver::TokioResolver;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{ResolverError, ResolverResult};
use crate::name::clean_txt_value;
use crate::TxtResolver;

/// Queries TXT records through the platform's configured resolvers
/// (`/etc/resolv.conf` or the OS equivalent).
pub struct SystemResolver {
    name: String,
    resolver: TokioResolver,
}

impl SystemResolver {
    /// Create a resolver from the system configuration.
    pub fn new() -> ResolverResult<Self> {
        Self::named("system")
    }

    /// Same as [`SystemResolver::new`] with a custom diagnostics name.
    pub fn named(name: impl Into<String>) -> ResolverResult<Self> {
        let mut builder = TokioResolver::builder_tokio()
            .map_err(|e| ResolverError::Config(format!("failed to create resolver: {e}")))?;
        disable_answer_cache(builder.options_mut());
        let resolver = builder.build();
        Ok(Self {
            name: name.into(),
            resolver,
        })
    }
}

/// Every check must see the resolver's current view of the zone, so
/// answers (including NXDOMAIN) are never cached between queries.
fn disable_answer_cache(opts: &mut ResolverOpts) {
    opts.cache_size = 0;
    opts.positive_max_ttl = Some(Duration::ZERO);
    opts.negative_max_ttl = Some(Duration::ZERO);
}

#[async_trait]
impl TxtResolver for SystemResolver {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(resolver = %self.name))]
    async fn query_txt(&self, host: &str) -> ResolverResult<Vec<String>> {
        match self.resolver.txt_lookup(host).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    // A single TXT record may be split into 255-byte strings.
                    let joined: String = txt
                        .txt_data()
                        .iter()
                        .map(|data| String::from_utf8_lossy(data))
                        .collect();
                    clean_txt_value(&joined)
                })
                .collect()),
            Err(e) if e.is_no_records_found() => {
                // NXDOMAIN or empty answer: nothing published
                debug!(host, "no TXT records");
                Ok(Vec::new())
            }
            Err(e) => Err(ResolverError::Dns(e.to_string())),
        }
    }
}
