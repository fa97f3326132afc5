//! Error kinds shared by the inventory core

use thiserror::Error;

use super::item::ItemStatus;
use super::tag::ResourceTag;

pub type Result<T, E = InventoryError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Resource tag '{0}' is already in use. Choose another or leave it blank.")]
    DuplicateIdentifier(ResourceTag),

    #[error("Could not generate a free resource tag after {0} attempts")]
    IdentifierSpaceExhausted(usize),

    #[error("Invalid resource tag: '{0}'")]
    InvalidTag(String),

    #[error("Item not found: {0}")]
    NotFound(ResourceTag),

    #[error("Cannot {action} {tag}: item is {from}")]
    InvalidTransition {
        tag: ResourceTag,
        from: ItemStatus,
        action: &'static str,
    },

    #[error("A holder name is required to register a loan")]
    MissingHolder,

    #[error("Model is required")]
    MissingModel,

    #[error("{0} is already in the cart")]
    AlreadyStaged(ResourceTag),

    #[error("{tag} is not available (status: {status})")]
    ItemNotAvailable { tag: ResourceTag, status: ItemStatus },

    #[error("The cart is empty")]
    EmptyBatch,

    #[error("Loan aborted, no items were changed. No longer available: {}", join_tags(.0))]
    BatchConflict(Vec<ResourceTag>),

    #[error("Storage error: {0:#}")]
    Persistence(anyhow::Error),
}

impl InventoryError {
    /// Returns true if the operation may succeed when simply retried.
    ///
    /// Only storage failures caused by I/O qualify. A data file with
    /// invalid rows fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            InventoryError::Persistence(err) => err.chain().any(|cause| cause.is::<std::io::Error>()),
            _ => false,
        }
    }
}

fn join_tags(tags: &[ResourceTag]) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
