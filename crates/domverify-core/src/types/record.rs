use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainId, RecordId};

/// DNS record type owners must publish
pub const TXT_RECORD_TYPE: &str = "TXT";

/// How ownership of a domain is proven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// TXT record under the verification host
    Dns,
    /// File served from a well-known path (declared, not implemented)
    File,
    /// HTML meta tag on the landing page (declared, not implemented)
    Html,
}

impl Method {
    /// Returns true if an executing checker exists for this method
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Dns)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::File => "file",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(Self::Dns),
            "file" => Ok(Self::File),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown verification method: {other}")),
        }
    }
}

/// Lifecycle state of a verification record.
///
/// `Pending` is the only non-terminal state. The listing's mirrored
/// verification status uses the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Awaiting proof
    Pending,
    /// Ownership proven (terminal)
    Verified,
    /// Abandoned, superseded or rejected by an administrator (terminal)
    Rejected,
}

impl Status {
    /// Returns true for `Verified` and `Rejected`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown verification status: {other}")),
        }
    }
}

/// A listing may only become publicly sellable once its mirrored
/// verification status is `Verified`.
#[must_use]
pub const fn can_publish(listing_status: Option<Status>) -> bool {
    matches!(listing_status, Some(Status::Verified))
}

/// One verification attempt and its lifecycle.
///
/// Records are never deleted. A domain accumulates records over time and
/// only the newest is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    /// Unique record identifier
    pub id: RecordId,

    /// Listing being verified
    pub domain_id: DomainId,

    /// Proof method
    pub method: Method,

    /// Current lifecycle state
    pub status: Status,

    /// Fully-qualified host the proof must be published under
    pub host: String,

    /// Proof token the owner must publish
    pub expected_value: String,

    /// Number of checks performed so far
    #[serde(default)]
    pub attempts: u32,

    /// Time of the most recent check
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Create a fresh `pending` record
    #[must_use]
    pub fn pending(
        id: RecordId,
        domain_id: DomainId,
        method: Method,
        host: impl Into<String>,
        expected_value: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            domain_id,
            method,
            status: Status::Pending,
            host: host.into(),
            expected_value: expected_value.into(),
            attempts: 0,
            last_checked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true while the record can still be checked or decided
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending)
    }

    /// What the owner has to publish for this record
    #[must_use]
    pub fn instructions(&self) -> Instructions {
        Instructions {
            host: self.host.clone(),
            record_type: TXT_RECORD_TYPE.to_string(),
            expected_value: self.expected_value.clone(),
        }
    }
}

/// DNS publishing instructions handed to the domain owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    /// Host label, e.g. `_domainverify.example.com.`
    pub host: String,

    /// Always `TXT`
    pub record_type: String,

    /// Exact value to publish, without quotes or whitespace
    pub expected_value: String,
}
