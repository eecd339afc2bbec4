//! Core types for the domain ownership verification engine.
//!
//! This crate provides the foundational types shared by the resolver
//! clients, the verification engine and its callers:
//!
//! - **Types**: verification records, lifecycle states, per-resolver
//!   diagnostics, audit entries and the transport-agnostic API payloads
//! - **Errors**: the verification error taxonomy, [`VerifyError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use domverify_core::{Status, VerificationRecord};
//!
//! fn describe(record: &VerificationRecord) -> String {
//!     match record.status {
//!         Status::Pending => format!("waiting for TXT at {}", record.host),
//!         Status::Verified => "verified".to_string(),
//!         Status::Rejected => "rejected".to_string(),
//!     }
//! }
//! ```

mod error;
pub mod types;

pub use error::{Result, VerifyError};
pub use types::*;
