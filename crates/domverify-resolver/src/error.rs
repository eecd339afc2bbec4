use thiserror::Error;

/// Result type alias for a single resolver query
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Failure of one resolver. Absorbed into diagnostics by the consensus
/// checker, never surfaced as a failed check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// DoH endpoint returned a non-2xx response
    #[error("DoH endpoint returned HTTP {code}")]
    Status {
        /// HTTP status code
        code: u16,
    },

    /// Resolver answered with a DNS error code other than NXDOMAIN
    #[error("DNS response code {0}")]
    DnsStatus(u16),

    /// Response could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Stub resolver lookup failed
    #[error("DNS lookup failed: {0}")]
    Dns(String),

    /// Request exceeded the HTTP client timeout
    #[error("query timed out")]
    Timeout,

    /// Resolver could not be constructed
    #[error("resolver configuration error: {0}")]
    Config(String),
}

impl ResolverError {
    /// Returns true if retrying the same query may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Dns(_) | Self::Timeout => true,
            Self::Status { code } => *code >= 500 || *code == 429,
            // SERVFAIL
            Self::DnsStatus(rcode) => *rcode == 2,
            Self::Malformed(_) | Self::Config(_) => false,
        }
    }
}

impl From<ResolverError> for domverify_core::VerifyError {
    fn from(err: ResolverError) -> Self {
        Self::Resolver(err.to_string())
    }
}
