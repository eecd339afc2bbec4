//! Domain ownership verification through multi-resolver DNS TXT consensus.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domverify::{ConsensusChecker, EngineConfig, Method, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> domverify::Result<()> {
//!     let config = EngineConfig::load("domverify.toml".as_ref())?;
//!     let checker = Arc::new(ConsensusChecker::from_settings(&config.resolvers)?);
//!
//!     // `collab` wires your identity, listing and notification services
//!     let orchestrator = Orchestrator::new(collab, checker, &config);
//!
//!     let started = orchestrator.start(&user, &domain, Method::Dns).await?;
//!     println!(
//!         "Publish TXT {} at {}",
//!         started.instructions.expected_value, started.instructions.host
//!     );
//!
//!     // later, once DNS has had time to propagate
//!     let outcome = orchestrator.check(&started.record_id).await?;
//!     println!("{}", outcome.message);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for the DoH resolvers (recommended)
//! - `native-tls` - Use system native TLS

// Re-export core types
pub use domverify_core::*;

// Re-export resolvers and the consensus checker
pub use domverify_resolver::{
    clean_txt_value, normalize_record_name, record_host, ConsensusChecker, ConsensusReport,
    DohResolver, DohResolverBuilder, ResolverError, ResolverResult, ResolverSettings,
    RetryConfig, SystemResolver, TxtResolver, CLOUDFLARE_DOH_URL, GOOGLE_DOH_URL,
};

// Re-export the engine
pub use domverify_engine::{
    AdminQueue, Collaborators, EngineConfig, IdentityProvider, ListingStore, MemoryStore,
    Notifier, NotifyEvent, Orchestrator, RecordStore, TokenGenerator, Transition,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
