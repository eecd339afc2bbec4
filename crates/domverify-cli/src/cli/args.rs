//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Prove domain ownership with DNS TXT records
///
/// Publishes nothing itself: it tells you what to publish and checks
/// whether independent resolvers can see it.
#[derive(Parser, Debug)]
#[command(name = "domverify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "DOMVERIFY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a token is visible under a domain's verification host
    Check(CheckArgs),

    /// Print the TXT record to publish for a domain
    Instructions(InstructionsArgs),

    /// Manage the config file
    Config(ConfigArgs),
}

// ============================================================================
// Check command
// ============================================================================

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain being verified (e.g. example.com)
    pub domain: String,

    /// Token expected in the TXT record
    pub token: String,

    /// Host label override (defaults to the configured label)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Skip the local system resolver
    #[arg(long)]
    pub no_system: bool,
}

// ============================================================================
// Instructions command
// ============================================================================

#[derive(Args, Debug)]
pub struct InstructionsArgs {
    /// Domain being verified
    pub domain: String,

    /// Use this token instead of generating a fresh one
    #[arg(short, long)]
    pub token: Option<String>,

    /// Host label override (defaults to the configured label)
    #[arg(short, long)]
    pub label: Option<String>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
