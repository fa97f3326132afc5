//! Configuration handling for gear
//!
//! Configuration is stored in `.gear/config.toml` (project) and
//! `~/.config/gear-cli/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_MAX_ATTEMPTS;

/// Name of the project directory
pub const GEAR_DIR: &str = ".gear";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Where inventory data is kept, relative to `.gear/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Inventory data file
    pub data_file: String,

    /// Directory for dated backups
    pub backup_dir: String,

    /// Pending loan cart
    pub cart_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: "inventory.csv".to_string(),
            backup_dir: "backups".to_string(),
            cart_file: "cart.json".to_string(),
        }
    }
}

/// Resource tag generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagConfig {
    /// Random candidates tried before giving up on a generated tag
    pub max_attempts: usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub storage: StorageConfig,
    pub tags: TagConfig,
}

impl ProjectConfig {
    /// Rejects values that would make the store unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_file.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.data_file is empty".to_string()));
        }
        if self.storage.cart_file.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.cart_file is empty".to_string()));
        }
        if self.tags.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "tags.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self { project, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "gear", "gear-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(GEAR_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.gear/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(GEAR_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
