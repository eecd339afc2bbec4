//! Resolver clients and the consensus checker.
//!
//! A verification check asks several independent resolvers for the TXT
//! records under the verification host and merges their answers:
//!
//! ```text
//! ConsensusChecker::check(host, token)
//!   -> normalize host (lower-case, trailing dot)
//!   -> spawn one task per TxtResolver, each under its own timeout
//!        SystemResolver   (local stub, via hickory)
//!        DohResolver      (dns.google JSON API)
//!        DohResolver      (cloudflare-dns.com JSON API)
//!   -> join (bounded by the overall timeout)
//!   -> union + dedupe TXT values, exact membership test
//!   -> ConsensusReport { verified, found, per_resolver, diagnosis }
//! ```
//!
//! A failing resolver never fails the check. It only shows up in the
//! per-resolver diagnostics.

mod config;
mod consensus;
mod doh;
mod error;
mod name;
mod system;

pub use config::{ResolverSettings, RetryConfig};
pub use consensus::{ConsensusChecker, ConsensusReport};
pub use doh::{DohResolver, DohResolverBuilder, CLOUDFLARE_DOH_URL, GOOGLE_DOH_URL};
pub use error::{ResolverError, ResolverResult};
pub use name::{clean_txt_value, normalize_record_name, record_host};
pub use system::SystemResolver;

use async_trait::async_trait;

/// Capability shared by every resolver backend.
///
/// Implementations return the TXT values visible to that one resolver.
/// An empty vector means "answered, nothing published"; an error means the
/// resolver itself could not be asked.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Stable name used as the diagnostics key
    fn name(&self) -> &str;

    /// Query TXT records for a normalized, fully-qualified host
    async fn query_txt(&self, host: &str) -> ResolverResult<Vec<String>>;
}
