//! Item domain model
//!
//! An item is one physical piece of equipment. Its lending state follows a
//! small state machine:
//!
//! ```text
//!            loan               set_service
//! Loaned <---------- Available ------------> Service
//!        ---------->           <------------
//!          return_item          set_available
//! ```
//!
//! `set_service` and `set_available` are administrative overrides and are
//! accepted from any state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{InventoryError, Result};
use super::tag::ResourceTag;

/// Lending status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "Tillgänglig")]
    Available,
    #[serde(rename = "Utlånad")]
    Loaned,
    #[serde(rename = "Service")]
    Service,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [ItemStatus::Available, ItemStatus::Loaned, ItemStatus::Service];

    /// Label used in the data file
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Available => "Tillgänglig",
            ItemStatus::Loaned => "Utlånad",
            ItemStatus::Service => "Service",
        }
    }

    /// Lowercase English name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Loaned => "loaned",
            ItemStatus::Service => "service",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ItemStatus::Available)
    }

    pub fn is_loaned(&self) -> bool {
        matches!(self, ItemStatus::Loaned)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        ItemStatus::ALL
            .into_iter()
            .find(|status| {
                status.label().to_lowercase() == s.to_lowercase()
                    || status.name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("unknown status '{}' (expected available, loaned or service)", s))
    }
}

/// One piece of equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Primary key, never changes after registration
    pub resource_tag: ResourceTag,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// URL of a photo, not managed here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,

    pub status: ItemStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_holder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<NaiveDate>,
}

impl Item {
    /// Creates an available item with only the required fields set
    pub fn new(resource_tag: ResourceTag, model: impl Into<String>) -> Result<Self> {
        let model = model.into().trim().to_string();
        if model.is_empty() {
            return Err(InventoryError::MissingModel);
        }

        Ok(Self {
            resource_tag,
            model,
            manufacturer: None,
            item_type: None,
            color: None,
            barcode: None,
            serial_number: None,
            photo_ref: None,
            status: ItemStatus::Available,
            current_holder: None,
            loan_date: None,
        })
    }

    /// Checks that holder and loan date are set exactly when the item is loaned
    pub fn check_invariant(&self) -> std::result::Result<(), String> {
        if self.status.is_loaned() {
            let has_holder = self
                .current_holder
                .as_deref()
                .is_some_and(|h| !h.trim().is_empty());
            if has_holder && self.loan_date.is_some() {
                return Ok(());
            }
            return Err(format!(
                "{} is loaned but has no holder or loan date",
                self.resource_tag
            ));
        }

        if self.current_holder.is_some() || self.loan_date.is_some() {
            return Err(format!(
                "{} is {} but still has a holder or loan date",
                self.resource_tag, self.status
            ));
        }
        Ok(())
    }

    /// Lends the item to `holder` as of `date`
    pub fn loan(&mut self, holder: &str, date: NaiveDate) -> Result<()> {
        if !self.status.is_available() {
            return Err(self.invalid_transition("loan"));
        }

        let holder = holder.trim();
        if holder.is_empty() {
            return Err(InventoryError::MissingHolder);
        }

        self.status = ItemStatus::Loaned;
        self.current_holder = Some(holder.to_string());
        self.loan_date = Some(date);
        Ok(())
    }

    /// Takes the item back from its holder
    pub fn return_item(&mut self) -> Result<()> {
        if !self.status.is_loaned() {
            return Err(self.invalid_transition("return"));
        }

        self.status = ItemStatus::Available;
        self.clear_loan();
        Ok(())
    }

    /// Sends the item to service regardless of its current state
    pub fn set_service(&mut self) {
        self.status = ItemStatus::Service;
        self.clear_loan();
    }

    /// Marks the item available regardless of its current state
    pub fn set_available(&mut self) {
        self.status = ItemStatus::Available;
        self.clear_loan();
    }

    /// Display label for pickers, e.g. `Stratocaster [G1]`
    pub fn label(&self) -> String {
        format!("{} [{}]", self.model, self.resource_tag)
    }

    fn clear_loan(&mut self) {
        self.current_holder = None;
        self.loan_date = None;
    }

    fn invalid_transition(&self, action: &'static str) -> InventoryError {
        InventoryError::InvalidTransition {
            tag: self.resource_tag.clone(),
            from: self.status,
            action,
        }
    }
}

/// Field changes from the edit form
///
/// `None` leaves a field untouched. `Some("")` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub barcode: Option<String>,
    pub serial_number: Option<String>,
    pub photo_ref: Option<String>,
    /// Administrative status override; only Available or Service
    pub status: Option<ItemStatus>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == ItemPatch::default()
    }

    /// Applies the patch, leaving `item` untouched on error
    pub fn apply_to(&self, item: &mut Item) -> Result<()> {
        let mut next = item.clone();

        if let Some(model) = &self.model {
            let model = model.trim();
            if model.is_empty() {
                return Err(InventoryError::MissingModel);
            }
            next.model = model.to_string();
        }

        set_optional(&mut next.manufacturer, &self.manufacturer);
        set_optional(&mut next.item_type, &self.item_type);
        set_optional(&mut next.color, &self.color);
        set_optional(&mut next.barcode, &self.barcode);
        set_optional(&mut next.serial_number, &self.serial_number);
        set_optional(&mut next.photo_ref, &self.photo_ref);

        match self.status {
            None => {}
            Some(ItemStatus::Available) => next.set_available(),
            Some(ItemStatus::Service) => next.set_service(),
            // Loans need a holder and date, so they go through `loan`
            Some(ItemStatus::Loaned) if next.status.is_loaned() => {}
            Some(ItemStatus::Loaned) => {
                return Err(InventoryError::InvalidTransition {
                    tag: next.resource_tag.clone(),
                    from: next.status,
                    action: "mark as loaned without a holder",
                })
            }
        }

        *item = next;
        Ok(())
    }
}

/// Normalizes free text: trims, and maps blank to `None`
pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn set_optional(field: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *field = normalize(Some(value));
    }
}
