//! # domverify-cli
//!
//! Command-line front end for the domain verification engine.
//!
//! ## Features
//!
//! - **Consensus checks**: query every configured resolver for a TXT token
//!   and print per-resolver diagnostics
//! - **Instructions**: print the TXT record an owner has to publish
//! - **Config management**: locate, show and initialise the TOML config
//! - **Output formats**: pretty, colored text or JSON

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
