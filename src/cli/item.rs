//! Item CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::output::{status_marker, Output};
use crate::domain::{normalize, Item, ItemPatch, ItemStatus, ResourceTag};
use crate::storage::Project;

/// Descriptive fields shared by `add` and `edit`
#[derive(Args, Debug)]
pub struct ItemFields {
    /// Manufacturer (e.g. Fender)
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Kind of equipment (e.g. guitar, amp, microphone)
    #[arg(long = "type")]
    pub item_type: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub barcode: Option<String>,

    /// Serial number
    #[arg(long = "serial")]
    pub serial_number: Option<String>,

    /// URL of a photo of the item
    #[arg(long = "photo")]
    pub photo_ref: Option<String>,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Register a new item
    ///
    /// Examples:
    ///   gear item add "Stratocaster" --manufacturer Fender   # Generated ID-#### tag
    ///   gear item add "Precision Bass" --tag BAS-01          # Own tag
    Add {
        /// Model name
        model: String,

        /// Resource tag (generated when omitted)
        #[arg(long)]
        tag: Option<String>,

        #[command(flatten)]
        fields: ItemFields,
    },

    /// List items
    List {
        /// Only show items with this status (available, loaned, service)
        #[arg(long)]
        status: Option<ItemStatus>,
    },

    /// Show item details
    Show {
        /// Resource tag
        tag: ResourceTag,
    },

    /// Edit an item's details or override its status
    Edit {
        /// Resource tag
        tag: ResourceTag,

        #[arg(long)]
        model: Option<String>,

        #[command(flatten)]
        fields: ItemFields,

        /// Set status directly (available or service)
        #[arg(long)]
        status: Option<ItemStatus>,
    },

    /// Delete an item permanently
    Delete {
        /// Resource tag
        tag: ResourceTag,
    },

    /// Lend a single item
    Loan {
        /// Resource tag
        tag: ResourceTag,

        /// Who is borrowing the item
        #[arg(long)]
        holder: String,

        /// Loan date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Register a returned item
    Return {
        /// Resource tag
        tag: ResourceTag,
    },

    /// Send an item to service
    Service {
        /// Resource tag
        tag: ResourceTag,
    },

    /// Mark an item available again
    Available {
        /// Resource tag
        tag: ResourceTag,
    },
}

pub fn run(cmd: ItemCommands, output: &Output) -> Result<()> {
    match cmd {
        ItemCommands::Add { model, tag, fields } => add_item(output, &model, tag.as_deref(), fields),
        ItemCommands::List { status } => list_items(output, status),
        ItemCommands::Show { tag } => show_item(output, &tag),
        ItemCommands::Edit {
            tag,
            model,
            fields,
            status,
        } => {
            let patch = ItemPatch {
                model,
                manufacturer: fields.manufacturer,
                item_type: fields.item_type,
                color: fields.color,
                barcode: fields.barcode,
                serial_number: fields.serial_number,
                photo_ref: fields.photo_ref,
                status,
            };
            edit_item(output, &tag, &patch)
        }
        ItemCommands::Delete { tag } => delete_item(output, &tag),
        ItemCommands::Loan { tag, holder, date } => {
            let date = date.unwrap_or_else(super::today);
            transition(output, &tag, "Loaned", |item| item.loan(&holder, date))
        }
        ItemCommands::Return { tag } => transition(output, &tag, "Returned", Item::return_item),
        ItemCommands::Service { tag } => transition(output, &tag, "Sent to service", |item| {
            item.set_service();
            Ok(())
        }),
        ItemCommands::Available { tag } => transition(output, &tag, "Marked available", |item| {
            item.set_available();
            Ok(())
        }),
    }
}

fn add_item(output: &Output, model: &str, tag: Option<&str>, fields: ItemFields) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.inventory_store();
    let mut inventory = store.load()?;

    let tag = project
        .tag_generator()
        .assign(&inventory, tag, &mut rand::thread_rng())?;

    let mut item = Item::new(tag, model)?;
    item.manufacturer = normalize(fields.manufacturer.as_deref());
    item.item_type = normalize(fields.item_type.as_deref());
    item.color = normalize(fields.color.as_deref());
    item.barcode = normalize(fields.barcode.as_deref());
    item.serial_number = normalize(fields.serial_number.as_deref());
    item.photo_ref = normalize(fields.photo_ref.as_deref());

    let item = inventory.insert(item)?.clone();
    store.save(&inventory)?;
    tracing::debug!(tag = %item.resource_tag, "registered item");

    if output.is_json() {
        output.data(&item);
    } else {
        output.success(&format!("Registered {}", item.label()));
    }

    Ok(())
}

fn list_items(output: &Output, status: Option<ItemStatus>) -> Result<()> {
    let project = Project::open_current()?;
    let inventory = project.inventory_store().load()?;

    match status {
        Some(status) => output.items(inventory.with_status(status)),
        None => output.items(inventory.items()),
    }

    Ok(())
}

fn show_item(output: &Output, tag: &ResourceTag) -> Result<()> {
    let project = Project::open_current()?;
    let inventory = project.inventory_store().load()?;
    let item = inventory.find_by_tag(tag)?;

    if output.is_json() {
        output.data(item);
        return Ok(());
    }

    println!("{}", item.label());
    println!("Status:       {}", status_marker(item.status));
    if let Some(holder) = &item.current_holder {
        println!("Holder:       {}", holder);
    }
    if let Some(date) = &item.loan_date {
        println!("Loaned since: {}", date);
    }

    let details = [
        ("Manufacturer", &item.manufacturer),
        ("Type", &item.item_type),
        ("Color", &item.color),
        ("Barcode", &item.barcode),
        ("Serial", &item.serial_number),
        ("Photo", &item.photo_ref),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("{:<13} {}", format!("{}:", label), value);
        }
    }

    Ok(())
}

fn edit_item(output: &Output, tag: &ResourceTag, patch: &ItemPatch) -> Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field to edit.");
    }

    let project = Project::open_current()?;
    let store = project.inventory_store();
    let mut inventory = store.load()?;

    let item = inventory.update(tag, patch)?.clone();
    store.save(&inventory)?;

    if output.is_json() {
        output.data(&item);
    } else {
        output.success(&format!("Updated {}", item.label()));
    }

    Ok(())
}

fn delete_item(output: &Output, tag: &ResourceTag) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.inventory_store();
    let mut inventory = store.load()?;

    let removed = inventory.delete(tag)?;
    store.save(&inventory)?;

    // A deleted item can't be lent, so drop it from the pending cart too
    let cart_store = project.cart_store();
    let mut cart = cart_store.load()?;
    if cart.remove(tag) {
        cart_store.save(&cart)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "deleted": removed.resource_tag,
            "model": removed.model,
        }));
    } else {
        output.success(&format!("Deleted {}", removed.label()));
    }

    Ok(())
}

fn transition<F>(output: &Output, tag: &ResourceTag, verb: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut Item) -> crate::domain::Result<()>,
{
    let project = Project::open_current()?;
    let store = project.inventory_store();
    let mut inventory = store.load()?;

    let item = inventory.transition(tag, f)?.clone();
    store.save(&inventory)?;
    tracing::debug!(tag = %item.resource_tag, status = %item.status, "item transitioned");

    if output.is_json() {
        output.data(&item);
    } else {
        match &item.current_holder {
            Some(holder) => output.success(&format!("{} {} to {}", verb, item.label(), holder)),
            None => output.success(&format!("{} {}", verb, item.label())),
        }
    }

    Ok(())
}
