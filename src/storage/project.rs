//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::GEAR_DIR;
use super::{CartStore, Config, InventoryStore};
use crate::domain::TagGenerator;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a gear project. Run 'gear init' first.")]
    NotInProject,
}

/// A gear project: one inventory plus its configuration
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(GEAR_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;
        tracing::debug!(root = %root.display(), "opened project");

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let gear_dir = root.join(GEAR_DIR);

        fs::create_dir_all(&gear_dir)
            .with_context(|| format!("Failed to create .gear directory: {}", gear_dir.display()))?;

        // Create default config
        let config_path = gear_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# gear configuration

[storage]
# Inventory data file, relative to .gear/
data_file = "inventory.csv"

# Where 'gear export' writes dated backups
backup_dir = "backups"

# Pending loan cart
cart_file = "cart.json"

[tags]
# Random ID-#### candidates tried before giving up
max_attempts = 1000
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // The cart is per operator session and never shared
        let gitignore_path = gear_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "cart.json\n*.tmp\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;

        // Start with an empty data file so the header is there for spreadsheets
        let store = project.inventory_store();
        if !store.path().exists() {
            store.save(&crate::domain::Inventory::new())?;
        }

        Ok(project)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .gear directory path
    pub fn gear_dir(&self) -> PathBuf {
        self.root.join(GEAR_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the inventory store
    pub fn inventory_store(&self) -> InventoryStore {
        InventoryStore::new(self.gear_dir().join(&self.config.project.storage.data_file))
    }

    /// Returns the pending cart store
    pub fn cart_store(&self) -> CartStore {
        CartStore::new(self.gear_dir().join(&self.config.project.storage.cart_file))
    }

    /// Returns the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.gear_dir().join(&self.config.project.storage.backup_dir)
    }

    /// Returns a tag generator configured for this project
    pub fn tag_generator(&self) -> TagGenerator {
        TagGenerator::new(self.config.project.tags.max_attempts)
    }
}
