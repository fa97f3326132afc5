//! JSON storage for the operator's pending loan cart
//!
//! The cart lives in `.gear/cart.json` between commands so items can be
//! staged one command at a time. An empty cart removes the file.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{InventoryError, LoanBatch};

/// Store for the pending loan cart
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cart; a missing file is an empty cart
    pub fn load(&self) -> Result<LoanBatch, InventoryError> {
        self.read().map_err(InventoryError::Persistence)
    }

    /// Persists the cart, removing the file once it is empty
    pub fn save(&self, cart: &LoanBatch) -> Result<(), InventoryError> {
        let result = if cart.is_empty() {
            self.remove()
        } else {
            self.write(cart)
        };
        result.map_err(InventoryError::Persistence)?;
        tracing::debug!(path = %self.path.display(), staged = cart.len(), "saved cart");
        Ok(())
    }

    fn read(&self) -> Result<LoanBatch> {
        if !self.path.exists() {
            return Ok(LoanBatch::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open cart: {}", self.path.display()))?;
        file.lock_shared()
            .context("Failed to acquire read lock on cart")?;

        serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse cart: {}", self.path.display()))
    }

    fn write(&self, cart: &LoanBatch) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
            file.lock_exclusive()
                .context("Failed to acquire write lock on cart")?;
            serde_json::to_writer_pretty(&file, cart).context("Failed to serialize cart")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove cart: {}", self.path.display()))?;
        }
        Ok(())
    }
}
