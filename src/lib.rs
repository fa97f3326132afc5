//! gear - A local-first inventory and lending tracker
//!
//! Tracks instruments and other equipment, who has borrowed what, and what
//! is out for service. Loans can be registered one item at a time or staged
//! in a cart and committed together.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Inventory, InventoryError, Item, ItemStatus, LoanBatch, ResourceTag};
