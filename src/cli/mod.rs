//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup and overview | `init`, `status` |
//! | Item | Register and maintain gear | `item add`, `item edit`, `item return` |
//! | Cart | Multi-item loans | `cart add`, `cart commit` |
//! | Query | Finding and backing up | `search`, `export` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod item;
mod cart;
mod query;

use chrono::{Local, NaiveDate};

use crate::domain::InventoryError;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};

/// Today's date in local time, used when no loan date is given
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Follow-up advice for a failed command, if there is any
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<InventoryError>()?;
    match err {
        InventoryError::Persistence(_) if err.is_retryable() => {
            Some("The data file could not be read or written. Check the path and try again.")
        }
        InventoryError::Persistence(_) => {
            Some("The data file has invalid rows. Fix the reported row and run the command again.")
        }
        _ => cart::hint(err),
    }
}
