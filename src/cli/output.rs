//! Output formatting for CLI commands

use console::style;
use serde::Serialize;

pub use crate::storage::OutputFormat;

use crate::domain::{Item, ItemStatus};

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers normally render text themselves; this is the fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints items as a table (text) or an array (JSON)
    pub fn items<'a>(&self, items: impl IntoIterator<Item = &'a Item>) {
        let items: Vec<&Item> = items.into_iter().collect();

        if self.is_json() {
            self.data(&items);
            return;
        }

        if items.is_empty() {
            println!("No items.");
            return;
        }

        println!(
            "{:<10} {:<12} {:<28} {:<16} {}",
            "TAG", "STATUS", "MODEL", "HOLDER", "SINCE"
        );
        println!("{}", "-".repeat(80));
        for item in items {
            println!(
                "{:<10} {:<12} {:<28} {:<16} {}",
                item.resource_tag,
                status_marker(item.status),
                item.model,
                item.current_holder.as_deref().unwrap_or("-"),
                item.loan_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
    }
}

/// Status text with a color cue when stdout is a terminal
pub fn status_marker(status: ItemStatus) -> String {
    // Pad before styling so escape codes don't break column alignment
    let text = style(format!("{:<12}", status.name()));
    let styled = match status {
        ItemStatus::Available => text.green(),
        ItemStatus::Loaned => text.yellow(),
        ItemStatus::Service => text.red(),
    };
    styled.to_string()
}

/// Turns off colors when `NO_COLOR` is set, on top of the terminal check
pub fn init_colors() {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        console::set_colors_enabled(false);
    }
}
