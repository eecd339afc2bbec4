use serde::{Deserialize, Serialize};

/// Propagation guidance appended to every "not yet visible" message
pub const PROPAGATION_HINT: &str =
    "DNS changes usually propagate within 3-10 minutes, but can take up to 24-48 hours";

/// What a single resolver reported during a consensus check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolverOutcome {
    /// Resolver answered; `records` may be empty
    Answered {
        /// Cleaned TXT values as seen by this resolver
        records: Vec<String>,
    },
    /// Resolver could not be queried or returned garbage
    Failed {
        /// Last error observed
        error: String,
    },
    /// Resolver did not answer within its budget
    TimedOut,
}

impl ResolverOutcome {
    /// Returns true if the resolver produced an answer (even an empty one)
    #[must_use]
    pub const fn answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }

    /// TXT values returned, empty for failures
    #[must_use]
    pub fn records(&self) -> &[String] {
        match self {
            Self::Answered { records } => records,
            _ => &[],
        }
    }
}

/// Why a consensus check passed or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    /// Expected value is published
    Verified,
    /// TXT records exist under the host but none match
    ValueMismatch,
    /// Resolvers answered but nothing is published under the host
    NoRecord,
    /// No resolver could be reached
    Unreachable,
}

impl Diagnosis {
    /// Human-actionable explanation for the domain owner
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Verified => "Domain ownership verified.".to_string(),
            Self::ValueMismatch => "A TXT record was found under the verification host, but its \
                 value does not match the expected token. Check for typos or stray quotes."
                .to_string(),
            Self::NoRecord => format!(
                "No TXT record found under the verification host yet. \
                 This is usually propagation delay: {PROPAGATION_HINT}."
            ),
            Self::Unreachable => format!(
                "Unable to reach any DNS resolver right now, so the record could not be \
                 checked. Please try again shortly. {PROPAGATION_HINT}."
            ),
        }
    }

    /// Returns true only for [`Diagnosis::Verified`]
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}
