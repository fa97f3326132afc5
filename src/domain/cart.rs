//! Loan cart
//!
//! Items are staged one at a time and then lent to a single holder in one
//! commit. The commit checks every staged item against the current inventory
//! before changing any of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{InventoryError, Result};
use super::inventory::Inventory;
use super::item::Item;
use super::tag::ResourceTag;

/// Items staged for a pending loan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBatch {
    #[serde(default)]
    items: Vec<Item>,
}

impl LoanBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots of the staged items, in the order they were added
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, tag: &ResourceTag) -> bool {
        self.items.iter().any(|item| &item.resource_tag == tag)
    }

    /// Stages an item, checking its status in the current inventory
    pub fn add(&mut self, inventory: &Inventory, tag: &ResourceTag) -> Result<&Item> {
        if self.contains(tag) {
            return Err(InventoryError::AlreadyStaged(tag.clone()));
        }

        let item = inventory.find_by_tag(tag)?;
        if !item.status.is_available() {
            return Err(InventoryError::ItemNotAvailable {
                tag: tag.clone(),
                status: item.status,
            });
        }

        self.items.push(item.clone());
        Ok(&self.items[self.items.len() - 1])
    }

    /// Unstages an item. Returns false if it was not in the cart.
    pub fn remove(&mut self, tag: &ResourceTag) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.resource_tag != tag);
        self.items.len() != before
    }

    /// Abandons the pending loan
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lends every staged item to `holder` as of `date`.
    ///
    /// Either every item is loaned and the cart is emptied, or nothing in
    /// the inventory or the cart changes. Returns the tags that were loaned.
    pub fn commit(
        &mut self,
        inventory: &mut Inventory,
        holder: &str,
        date: NaiveDate,
    ) -> Result<Vec<ResourceTag>> {
        if self.items.is_empty() {
            return Err(InventoryError::EmptyBatch);
        }
        if holder.trim().is_empty() {
            return Err(InventoryError::MissingHolder);
        }

        let conflicts: Vec<ResourceTag> = self
            .items
            .iter()
            .map(|staged| &staged.resource_tag)
            .filter(|tag| {
                inventory
                    .find_by_tag(tag)
                    .map(|current| !current.status.is_available())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        if !conflicts.is_empty() {
            tracing::debug!(?conflicts, "loan commit aborted");
            return Err(InventoryError::BatchConflict(conflicts));
        }

        let mut next = inventory.clone();
        for staged in &self.items {
            next.transition(&staged.resource_tag, |item| item.loan(holder, date))?;
        }

        let loaned: Vec<ResourceTag> = self
            .items
            .drain(..)
            .map(|item| item.resource_tag)
            .collect();
        *inventory = next;

        tracing::debug!(count = loaned.len(), holder, %date, "loan committed");
        Ok(loaned)
    }
}
