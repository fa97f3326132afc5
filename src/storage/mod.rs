//! # Storage Layer
//!
//! Persistence layer for gear with spreadsheet-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Inventory | CSV with Swedish headers | `.gear/inventory.csv` |
//! | Pending cart | JSON | `.gear/cart.json` |
//! | Config | TOML | `.gear/config.toml` |
//! | Backups | CSV | `.gear/backups/inventarie_backup_{date}.csv` |
//!
//! ## Concurrency Safety
//!
//! There is one writer at a time. Stores still take `fs2` locks and
//! write through a temp file + rename, so a failed save never leaves a
//! half-written file behind.
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a gear project
//! - [`InventoryStore`] - Load/save the inventory as CSV
//! - [`CartStore`] - Load/save the pending loan cart
//! - [`Config`] - Project and global configuration

mod csv_store;
mod cart_store;
mod config;
mod project;

pub use csv_store::{backup_file_name, to_csv_string, InventoryStore};
pub use cart_store::CartStore;
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, GEAR_DIR};
pub use project::{Project, ProjectError};
