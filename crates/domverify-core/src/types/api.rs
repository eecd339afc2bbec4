//! Transport-agnostic request and response payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DomainId, Instructions, Method, RecordId, ResolverOutcome, VerificationRecord};

/// `POST /verifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// Listing to verify
    pub domain_id: DomainId,

    /// Proof method
    pub method: Method,
}

/// Response to a start or resend call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    /// Newly created (or resent) record
    pub record_id: RecordId,

    /// What to publish
    pub instructions: Instructions,
}

impl From<&VerificationRecord> for StartResponse {
    fn from(record: &VerificationRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            instructions: record.instructions(),
        }
    }
}

/// Diagnostics attached to a check response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Outcome per resolver name
    pub per_resolver: BTreeMap<String, ResolverOutcome>,

    /// Union of all TXT values seen, deduplicated
    #[serde(default)]
    pub found: Vec<String>,
}

/// `POST /verifications/{id}/check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the record is now verified
    pub verified: bool,

    /// Human-actionable explanation
    pub message: String,

    /// Per-resolver detail
    pub diagnostics: Diagnostics,
}

/// `POST /admin/verifications/{id}/reject`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Optional free-text reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// One row of `GET /admin/verifications`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    /// The record under review
    pub record: VerificationRecord,

    /// Listing name, if the listing still exists
    pub listing_name: Option<String>,
}
