use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Priority;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Namespace inside the database; boards in different namespaces never see each other
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default = "default_block_duration")]
    pub default_block_duration: u32,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            namespace: default_namespace(),
            log_level: default_log_level(),
            default_priority: Priority::default(),
            default_block_duration: default_block_duration(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

// Default value functions
fn default_database_path() -> String {
    // This is a fallback - actual profile will be determined at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("board.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/planboard/board.db".to_string()
    }
}

fn default_namespace() -> String {
    utils::Profile::Prod.default_namespace().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_block_duration() -> u32 {
    60
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and database paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            // Create default config and save it
            let mut config = Config {
                database_path: Self::default_database_path_for_profile(profile),
                namespace: profile.default_namespace().to_string(),
                ..Config::default()
            };
            config.save_to_path(&config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file (the `--config` flag)
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("board.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/planboard-dev/board.db".to_string(),
                utils::Profile::Prod => "~/.local/share/planboard/board.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Log files live in a `logs` directory next to the database
    pub fn get_log_dir(&self) -> PathBuf {
        let db_path = self.get_database_path();
        db_path
            .parent()
            .map(|dir| dir.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("namespace = \"work\"\n").unwrap();
        assert_eq!(config.namespace, "work");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_priority, Priority::Medium);
        assert_eq!(config.default_block_duration, 60);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config {
            database_path: "/tmp/board.db".to_string(),
            default_priority: Priority::High,
            config_version: None,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.database_path, "/tmp/board.db");
        assert_eq!(loaded.default_priority, Priority::High);
        assert_eq!(loaded.config_version, Some(CURRENT_CONFIG_VERSION));
        assert_eq!(loaded.get_log_dir(), PathBuf::from("/tmp/logs"));
    }
}
