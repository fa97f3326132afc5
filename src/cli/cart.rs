//! Loan cart CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Inventory, InventoryError, LoanBatch, ResourceTag};
use crate::storage::{CartStore, InventoryStore, Project};

#[derive(Subcommand)]
pub enum CartCommands {
    /// Stage items for a loan
    ///
    /// Example:
    ///   gear cart add G1 G2 M4
    Add {
        /// Resource tags to stage
        #[arg(required = true)]
        tags: Vec<ResourceTag>,
    },

    /// Unstage an item (does nothing if it isn't staged)
    Remove {
        /// Resource tag
        tag: ResourceTag,
    },

    /// Show staged items
    List,

    /// Abandon the pending loan
    Clear,

    /// Lend every staged item to one holder
    Commit {
        /// Who is borrowing the items
        #[arg(long)]
        holder: String,

        /// Loan date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(cmd: CartCommands, output: &Output) -> Result<()> {
    match cmd {
        CartCommands::Add { tags } => add(output, &tags),
        CartCommands::Remove { tag } => remove(output, &tag),
        CartCommands::List => list(output),
        CartCommands::Clear => clear(output),
        CartCommands::Commit { holder, date } => {
            commit(output, &holder, date.unwrap_or_else(super::today))
        }
    }
}

fn add(output: &Output, tags: &[ResourceTag]) -> Result<()> {
    let project = Project::open_current()?;
    let inventory = project.inventory_store().load()?;
    let cart_store = project.cart_store();
    let mut cart = cart_store.load()?;

    // Stage all or nothing so a typo doesn't leave half the list staged
    let mut staged = Vec::new();
    for tag in tags {
        staged.push(cart.add(&inventory, tag)?.label());
    }
    cart_store.save(&cart)?;

    if output.is_json() {
        output.data(&cart);
    } else {
        for label in staged {
            output.success(&format!("Added {} to cart", label));
        }
        output.success(&format!("{} item(s) in cart", cart.len()));
    }

    Ok(())
}

fn remove(output: &Output, tag: &ResourceTag) -> Result<()> {
    let project = Project::open_current()?;
    let cart_store = project.cart_store();
    let mut cart = cart_store.load()?;

    let removed = cart.remove(tag);
    if removed {
        cart_store.save(&cart)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": removed,
            "tag": tag,
            "staged": cart.len(),
        }));
    } else if removed {
        output.success(&format!("Removed {} from cart", tag));
    } else {
        output.success(&format!("{} was not in the cart", tag));
    }

    Ok(())
}

fn list(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let cart = project.cart_store().load()?;

    if output.is_json() {
        output.data(&cart);
    } else if cart.is_empty() {
        println!("Cart is empty.");
    } else {
        output.items(cart.items());
    }

    Ok(())
}

fn clear(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let cart_store = project.cart_store();
    let mut cart = cart_store.load()?;

    let count = cart.len();
    cart.clear();
    cart_store.save(&cart)?;

    output.success(&format!("Cleared {} item(s) from cart", count));
    Ok(())
}

fn commit(output: &Output, holder: &str, date: NaiveDate) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.inventory_store();
    let cart_store = project.cart_store();

    let mut inventory = store.load()?;
    let mut cart = cart_store.load()?;

    let loaned = cart.commit(&mut inventory, holder, date)?;
    save_commit(&store, &cart_store, &inventory, &cart)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "holder": holder.trim(),
            "loan_date": date,
            "loaned": loaned,
        }));
    } else {
        let tags: Vec<&str> = loaned.iter().map(ResourceTag::as_str).collect();
        output.success(&format!(
            "Loaned {} item(s) to {} on {}: {}",
            loaned.len(),
            holder.trim(),
            date,
            tags.join(", ")
        ));
    }

    Ok(())
}

/// Persists a committed loan: inventory first, so a failure there leaves
/// the cart intact on disk
fn save_commit(
    store: &InventoryStore,
    cart_store: &CartStore,
    inventory: &Inventory,
    cart: &LoanBatch,
) -> Result<()> {
    store.save(inventory)?;
    cart_store.save(cart).map_err(|e| {
        tracing::warn!(error = %e, "loan saved but cart could not be cleared");
        anyhow::anyhow!(
            "Loan saved, but the cart could not be cleared ({}). Run 'gear cart clear'.",
            e
        )
    })
}

/// Suggestion printed next to a failed command
pub fn hint(err: &InventoryError) -> Option<&'static str> {
    match err {
        InventoryError::BatchConflict(_) => {
            Some("Remove the listed items with 'gear cart remove' and commit again.")
        }
        InventoryError::EmptyBatch => Some("Stage items with 'gear cart add <tag>' first."),
        InventoryError::ItemNotAvailable { .. } => Some("Check its status with 'gear item show'."),
        _ => None,
    }
}
