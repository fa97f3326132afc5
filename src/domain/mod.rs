//! Domain models for the inventory
//!
//! Contains the lending rules without any I/O concerns. Every operation works
//! on an explicit [`Inventory`] snapshot; persisting it is the caller's job.

mod error;
mod tag;
mod item;
mod inventory;
mod cart;
pub mod search;

pub use error::{InventoryError, Result};
pub use tag::{ResourceTag, TagGenerator, DEFAULT_MAX_ATTEMPTS};
pub use item::{normalize, Item, ItemPatch, ItemStatus};
pub use inventory::Inventory;
pub use cart::LoanBatch;
