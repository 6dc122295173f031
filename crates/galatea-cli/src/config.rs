//! Configuration management for Galatea CLI.

use anyhow::{bail, Context, Result};
use galatea::prelude::{BackendConfig, CatalogConfig, CellPolicyConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "galatea.toml";
pub const DATA_DIR: &str = ".galatea";

/// Galatea project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Nothing outlives the process.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file, relative to the project root.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub cell_policy: CellPolicyConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_substrate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default value functions
fn default_db_path() -> PathBuf { Path::new(DATA_DIR).join("galatea.db") }
fn default_page_size() -> usize { 10 }
fn default_filter() -> String { "warn".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load config from galatea.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.listing.page_size == 0 {
            bail!("listing.page_size must be at least 1");
        }
        if config.stage.cell_policy == CellPolicyConfig::DefaultFill
            && config.stage.default_substrate.is_none()
        {
            bail!("stage.cell_policy = \"default-fill\" needs stage.default_substrate");
        }
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Storage backend, with the database path resolved against `root`.
    pub fn backend(&self, root: &Path) -> BackendConfig {
        match self.storage.backend {
            StorageBackend::Sqlite => BackendConfig::sqlite(root.join(&self.storage.path)),
            StorageBackend::Memory => BackendConfig::in_memory(),
        }
    }

    pub fn catalog(&self) -> CatalogConfig {
        CatalogConfig {
            cell_policy: self.stage.cell_policy,
            default_substrate: self.stage.default_substrate.clone(),
        }
    }
}

/// Find galatea.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// The directory holding galatea.toml, or the current directory.
pub fn project_root() -> Result<PathBuf> {
    match find_config_file().and_then(|p| p.parent().map(Path::to_path_buf)) {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path, Path::new(".galatea").join("galatea.db"));
        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.stage.cell_policy, CellPolicyConfig::Strict);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [storage]
            backend = "memory"

            [listing]
            page_size = 25

            [stage]
            cell_policy = "default-fill"
            default_substrate = "peat"
            "#,
        )
        .unwrap();
        assert!(matches!(config.backend(Path::new("/tmp")), BackendConfig::InMemory));
        assert_eq!(config.listing.page_size, 25);
        assert_eq!(config.catalog().default_substrate.as_deref(), Some("peat"));
    }

    #[test]
    fn inconsistent_settings_are_rejected() {
        assert!(Config::parse("[listing]\npage_size = 0").is_err());
        assert!(Config::parse("[stage]\ncell_policy = \"default-fill\"").is_err());
        assert!(Config::parse("[storage]\nbackend = \"postgres\"").is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.listing.page_size = 3;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.listing.page_size, 3);
        assert_eq!(loaded.storage.path, config.storage.path);
    }
}
