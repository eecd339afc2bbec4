//! Command implementations.

pub mod check;
pub mod config;
pub mod instructions;

use std::path::PathBuf;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Config file in effect
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// Load the engine configuration from `config_path`.
    pub fn engine_config(&self) -> anyhow::Result<domverify::EngineConfig> {
        crate::config::load(&self.config_path)
    }
}
