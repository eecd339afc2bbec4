//! Configuration file location and management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use domverify::EngineConfig;
use std::path::{Path, PathBuf};

/// Default config file path in the platform config directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "domverify", "domverify")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().join("config.toml"))
}

/// `--config` if given, otherwise the default path.
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit.map_or_else(default_path, Ok)
}

/// Load the engine configuration, defaults if the file does not exist.
pub fn load(path: &Path) -> Result<EngineConfig> {
    EngineConfig::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Write a default configuration file.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}\n\
             Use --force to overwrite it.",
            path.display()
        );
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = EngineConfig::default().to_toml()?;
    std::fs::write(path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_path(Some(PathBuf::from("/etc/domverify.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/domverify.toml"));
    }

    #[test]
    fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(&path, false).unwrap();
        assert_eq!(load(&path).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "token_bytes = 32\n").unwrap();

        assert!(init(&path, false).is_err());
        assert_eq!(load(&path).unwrap().token_bytes, 32);

        init(&path, true).unwrap();
        assert_eq!(load(&path).unwrap().token_bytes, 20);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "token_bytes = \"many\"\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
