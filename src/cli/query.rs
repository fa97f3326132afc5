//! Read-only queries and backups

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{search, ItemStatus};
use crate::storage::{to_csv_string, Project};

/// Searches every field of every item
pub fn search(output: &Output, query: &str) -> Result<()> {
    let project = Project::open_current()?;
    let inventory = project.inventory_store().load()?;

    let results = search::filter(inventory.items(), query);
    tracing::debug!(query, found = results.len(), "search finished");

    if !output.is_json() && results.is_empty() {
        println!("No items match '{}'", query);
        return Ok(());
    }

    output.items(results);
    Ok(())
}

/// Shows counts per status and who currently holds what
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let inventory = project.inventory_store().load()?;
    let cart = project.cart_store().load()?;

    let counts = inventory.status_counts();
    let loans = inventory.loans_by_holder();

    if output.is_json() {
        let holders: serde_json::Map<String, serde_json::Value> = loans
            .iter()
            .map(|(holder, items)| {
                let tags: Vec<_> = items.iter().map(|i| i.resource_tag.to_string()).collect();
                (holder.to_string(), serde_json::json!(tags))
            })
            .collect();

        output.data(&serde_json::json!({
            "total": inventory.len(),
            "counts": counts,
            "loans": holders,
            "cart": cart.len(),
        }));
        return Ok(());
    }

    println!("Inventory: {} item(s)", inventory.len());
    for status in ItemStatus::ALL {
        println!("  {:<10} {}", status.name(), counts[status.name()]);
    }

    if !loans.is_empty() {
        println!();
        println!("On loan:");
        for (holder, items) in &loans {
            println!("  {}", holder);
            for item in items {
                let since = item.loan_date.map(|d| d.to_string()).unwrap_or_default();
                println!("    {:<10} {:<28} since {}", item.resource_tag, item.model, since);
            }
        }
    }

    if !cart.is_empty() {
        println!();
        println!("Cart: {} item(s) staged", cart.len());
    }

    Ok(())
}

/// Writes a dated backup file, or the CSV itself to stdout
pub fn export(output: &Output, dir: Option<PathBuf>, stdout: bool) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.inventory_store();
    let inventory = store.load()?;

    if stdout {
        let csv = to_csv_string(inventory.items())?;
        std::io::stdout()
            .write_all(csv.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let dir = dir.unwrap_or_else(|| project.backup_dir());
    let path = store.export(&inventory, &dir, super::today())?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.display().to_string(),
            "items": inventory.len(),
        }));
    } else {
        output.success(&format!(
            "Exported {} item(s) to {}",
            inventory.len(),
            path.display()
        ));
    }

    Ok(())
}
