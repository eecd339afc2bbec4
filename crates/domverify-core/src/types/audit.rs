use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AdminId, RecordId, UserId};

/// Who performed a manual transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Actor {
    /// Domain owner acting on their own record
    User(UserId),
    /// Administrator acting through the review queue
    Admin(AdminId),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Admin(id) => write!(f, "admin:{id}"),
        }
    }
}

/// Manual transition kinds kept in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Administrator forced `verified`
    Approved,
    /// Administrator forced `rejected`
    Rejected,
    /// Owner gave up on a pending record
    Abandoned,
    /// Pending record replaced by a newer one
    Superseded,
}

/// One audit trail entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Record that was transitioned
    pub record_id: RecordId,

    /// Acting identity
    pub actor: Actor,

    /// What was done
    pub action: AuditAction,

    /// Optional free-text reason
    #[serde(default)]
    pub reason: Option<String>,

    /// When it happened
    pub at: DateTime<Utc>,
}
