//! Domain ownership verification engine.
//!
//! Drives the verification record state machine:
//!
//! ```text
//!            start()
//!              |
//!              v
//!          +---------+   check() passes / admin approve()   +----------+
//!          | pending | -----------------------------------> | verified |
//!          +---------+                                      +----------+
//!              |
//!              |  admin reject() / abandon() / superseded   +----------+
//!              +------------------------------------------> | rejected |
//!                                                           +----------+
//! ```
//!
//! Automated checks never reject: a failed check leaves the record
//! `pending` because DNS propagation delay is not proof of anything.
//! Every transition out of `pending` is a single conditional update in the
//! [`RecordStore`], so concurrent callers cannot both win.

pub mod admin;
pub mod collaborators;
pub mod config;
pub mod orchestrator;
pub mod store;
pub mod token;

#[cfg(test)]
mod test_support;

pub use admin::AdminQueue;
pub use collaborators::{Collaborators, IdentityProvider, ListingStore, Notifier, NotifyEvent};
pub use config::EngineConfig;
pub use orchestrator::Orchestrator;
pub use store::{MemoryStore, RecordStore, Transition};
pub use token::TokenGenerator;
