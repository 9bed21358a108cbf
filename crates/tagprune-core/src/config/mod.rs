//! Configuration management for tagprune.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::{ConfigError, RelationsError};
use crate::tagging::RelationTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for tagprune.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relationship dataset settings
    pub relations: RelationsConfig,

    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tagprune.tagprune/config.toml
    /// - Linux: ~/.config/tagprune/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagprune\config\config.toml
    ///
    /// Falls back to ~/.tagprune/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagprune", "tagprune")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagprune").join("config.toml")
            })
    }

    /// Resolved external relations path (with ~ expansion), if configured.
    pub fn relations_path(&self) -> Option<PathBuf> {
        self.relations
            .path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }

    /// Build the relation table this configuration points at.
    ///
    /// Uses the configured dataset if set, the bundled one otherwise.
    pub fn relation_table(&self) -> Result<RelationTable, RelationsError> {
        match self.relations_path() {
            Some(path) => RelationTable::load(&path),
            None => RelationTable::bundled(),
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
