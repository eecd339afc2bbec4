//! Engine configuration.

use domverify_core::{Result, VerifyError};
use domverify_resolver::ResolverSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::token::MIN_TOKEN_BYTES;

/// Configuration for the verification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Host label the TXT record lives under (default: `_domainverify`).
    #[serde(default = "default_record_host_label")]
    pub record_host_label: String,

    /// Entropy per proof token in bytes (default: 20).
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,

    /// Resolver fan-out used by consensus checks.
    #[serde(default)]
    pub resolvers: ResolverSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_host_label: default_record_host_label(),
            token_bytes: default_token_bytes(),
            resolvers: ResolverSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| VerifyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VerifyError::Config(e.to_string()))
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let label = self.record_host_label.trim_matches('.');
        if label.is_empty() || label.contains('.') {
            return Err(VerifyError::Config(format!(
                "record_host_label must be a single DNS label, got '{}'",
                self.record_host_label
            )));
        }
        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(VerifyError::Config(format!(
                "token_bytes must be at least {MIN_TOKEN_BYTES}"
            )));
        }
        self.resolvers
            .validate()
            .map_err(|e| VerifyError::Config(e.to_string()))
    }
}

// Default value functions for serde.
fn default_record_host_label() -> String {
    String::from("_domainverify")
}

const fn default_token_bytes() -> usize {
    20
}
