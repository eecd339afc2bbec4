use thiserror::Error;

use crate::types::{Method, RecordId, Status};

/// Result type alias for verification operations
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors surfaced by the verification engine.
///
/// Resolver-level failures never appear here: they are absorbed into the
/// per-resolver diagnostics of a check. A check that finds no matching
/// record is a successful call carrying `verified: false`.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Verification method declared but without an executing checker
    #[error("verification method '{0}' is not supported")]
    UnsupportedMethod(Method),

    /// Caller does not own the domain
    #[error("user {user} does not own domain {domain}")]
    NotOwner {
        /// Acting user
        user: String,
        /// Domain the user tried to act on
        domain: String,
    },

    /// Caller is not an administrator
    #[error("{0} is not an administrator")]
    NotAdmin(String),

    /// Record or domain not found
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Record already left the `pending` state
    #[error("verification {id} is already {status}")]
    AlreadyTerminal {
        /// Record that was targeted
        id: RecordId,
        /// Its current terminal status
        status: Status,
    },

    /// Record store failure
    #[error("record store error: {0}")]
    Store(String),

    /// Listing store failure
    #[error("listing store error: {0}")]
    Listing(String),

    /// Resolver setup failed (a single query failing is not an error)
    #[error("resolver error: {0}")]
    Resolver(String),

    /// Random source failed while generating a token
    #[error("token generation failed")]
    Token,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerifyError {
    /// Shorthand for a missing verification record
    #[must_use]
    pub fn record_not_found(id: &RecordId) -> Self {
        Self::NotFound {
            resource: format!("verification {id}"),
        }
    }

    /// Returns true for idempotency notices that callers should report
    /// as information rather than failure
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::AlreadyTerminal { .. })
    }

    /// Returns true if the error is due to missing authorization
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::NotOwner { .. } | Self::NotAdmin(_))
    }

    /// HTTP-equivalent status code for transport adapters
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedMethod(_) => 400,
            Self::NotOwner { .. } | Self::NotAdmin(_) => 403,
            Self::NotFound { .. } => 404,
            Self::AlreadyTerminal { .. } => 409,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_terminal_is_informational() {
        let err = VerifyError::AlreadyTerminal {
            id: RecordId::new("abc"),
            status: Status::Verified,
        };
        assert!(err.is_informational());
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "verification abc is already verified");
    }

    #[test]
    fn status_codes() {
        assert_eq!(VerifyError::UnsupportedMethod(Method::File).status_code(), 400);
        assert_eq!(VerifyError::NotAdmin("mallory".into()).status_code(), 403);
        assert_eq!(
            VerifyError::record_not_found(&RecordId::new("x")).status_code(),
            404
        );
        assert_eq!(VerifyError::Store("down".into()).status_code(), 500);
        assert!(!VerifyError::Token.is_informational());
    }
}
