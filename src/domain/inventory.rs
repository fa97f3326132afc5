//! In-memory inventory snapshot
//!
//! Holds every item in insertion order. All mutations validate before they
//! touch anything, so a failed call leaves the snapshot exactly as it was.
//! Nothing here writes to disk; callers save the snapshot afterwards.

use std::collections::{BTreeMap, HashSet};

use super::error::{InventoryError, Result};
use super::item::{Item, ItemPatch, ItemStatus};
use super::tag::ResourceTag;

/// The authoritative collection of items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from stored items, rejecting repeated tags or
    /// items that break the loan invariant
    pub fn from_items(items: Vec<Item>) -> std::result::Result<Self, String> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(&item.resource_tag) {
                return Err(format!("duplicate resource tag {}", item.resource_tag));
            }
            item.check_invariant()?;
        }
        Ok(Self { items })
    }

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
        self.position(tag).is_some()
    }

    /// Looks up an item by its tag
    pub fn find_by_tag(&self, tag: &ResourceTag) -> Result<&Item> {
        self.items
            .iter()
            .find(|item| &item.resource_tag == tag)
            .ok_or_else(|| InventoryError::NotFound(tag.clone()))
    }

    /// Adds a new item at the end
    pub fn insert(&mut self, item: Item) -> Result<&Item> {
        if self.contains(&item.resource_tag) {
            return Err(InventoryError::DuplicateIdentifier(item.resource_tag));
        }
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Applies edit-form changes to one item
    pub fn update(&mut self, tag: &ResourceTag, patch: &ItemPatch) -> Result<&Item> {
        let index = self.require(tag)?;
        patch.apply_to(&mut self.items[index])?;
        Ok(&self.items[index])
    }

    /// Removes an item; its tag becomes free again
    pub fn delete(&mut self, tag: &ResourceTag) -> Result<Item> {
        let index = self.require(tag)?;
        Ok(self.items.remove(index))
    }

    /// Runs a lifecycle transition on one item
    ///
    /// The closure works on a copy which only replaces the stored item
    /// when it returns `Ok`.
    pub fn transition<F>(&mut self, tag: &ResourceTag, f: F) -> Result<&Item>
    where
        F: FnOnce(&mut Item) -> Result<()>,
    {
        let index = self.require(tag)?;
        let mut next = self.items[index].clone();
        f(&mut next)?;
        self.items[index] = next;
        Ok(&self.items[index])
    }

    /// Items with the given status, in inventory order
    pub fn with_status(&self, status: ItemStatus) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.status == status)
    }

    /// Number of items per status
    pub fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> =
            ItemStatus::ALL.iter().map(|s| (s.name(), 0)).collect();
        for item in &self.items {
            *counts.entry(item.status.name()).or_default() += 1;
        }
        counts
    }

    /// Loaned items grouped by holder
    pub fn loans_by_holder(&self) -> BTreeMap<&str, Vec<&Item>> {
        let mut loans: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
        for item in self.with_status(ItemStatus::Loaned) {
            if let Some(holder) = item.current_holder.as_deref() {
                loans.entry(holder).or_default().push(item);
            }
        }
        loans
    }

    fn position(&self, tag: &ResourceTag) -> Option<usize> {
        self.items.iter().position(|item| &item.resource_tag == tag)
    }

    fn require(&self, tag: &ResourceTag) -> Result<usize> {
        self.position(tag)
            .ok_or_else(|| InventoryError::NotFound(tag.clone()))
    }
}
