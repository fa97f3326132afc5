//! Resource tags and the generator that hands them out
//!
//! Tag format:
//! - Operator-supplied: any non-empty text (e.g. `G1`, `BAS-004`), trimmed
//! - Generated: `ID-{4 digits}` (e.g. `ID-0427`)
//!
//! Generated tags are random rather than sequential, so a deleted item's tag
//! may be handed out again later.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::{InventoryError, Result};
use super::inventory::Inventory;

/// Prefix for generated tags
pub const GENERATED_PREFIX: &str = "ID-";

/// Default number of candidates tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Unique identifier of one inventory item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceTag(String);

impl ResourceTag {
    /// Creates a tag from operator input, rejecting blank text
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        value.as_ref().parse()
    }

    /// Returns the tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this tag has the generated `ID-####` shape
    pub fn is_generated(&self) -> bool {
        self.0
            .strip_prefix(GENERATED_PREFIX)
            .map(|digits| digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for ResourceTag {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InventoryError::InvalidTag(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ResourceTag {
    type Error = InventoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceTag> for String {
    fn from(tag: ResourceTag) -> Self {
        tag.0
    }
}

impl AsRef<str> for ResourceTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Picks the tag for a newly registered item
#[derive(Debug, Clone, Copy)]
pub struct TagGenerator {
    max_attempts: usize,
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl TagGenerator {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Resolves the tag for a new item against the current snapshot.
    ///
    /// A non-blank `requested` tag is used as-is if free. A blank or missing
    /// one makes the generator draw `ID-####` candidates from `rng`.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        requested: Option<&str>,
        rng: &mut R,
    ) -> Result<ResourceTag> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(requested) => {
                let tag = ResourceTag::new(requested)?;
                if inventory.contains(&tag) {
                    return Err(InventoryError::DuplicateIdentifier(tag));
                }
                Ok(tag)
            }
            None => self.generate(inventory, rng),
        }
    }

    fn generate<R: Rng + ?Sized>(&self, inventory: &Inventory, rng: &mut R) -> Result<ResourceTag> {
        let taken: HashSet<&str> = inventory
            .items()
            .iter()
            .map(|item| item.resource_tag.as_str())
            .collect();

        for _ in 0..self.max_attempts {
            let candidate = format!("{}{:04}", GENERATED_PREFIX, rng.gen_range(0..10_000u32));
            if !taken.contains(candidate.as_str()) {
                return Ok(ResourceTag(candidate));
            }
        }

        tracing::warn!(attempts = self.max_attempts, "resource tag space exhausted");
        Err(InventoryError::IdentifierSpaceExhausted(self.max_attempts))
    }
}
