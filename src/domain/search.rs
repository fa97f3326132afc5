//! Free-text filtering over items

use super::item::Item;

/// Returns the items where `query` occurs in any field, ignoring case.
///
/// An empty query matches everything. Whitespace is part of the needle.
/// Input order is preserved.
pub fn filter<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| searchable_fields(item).any(|field| field.to_lowercase().contains(&needle)))
        .collect()
}

fn searchable_fields(item: &Item) -> impl Iterator<Item = String> + '_ {
    let optional = [
        &item.photo_ref,
        &item.manufacturer,
        &item.item_type,
        &item.color,
        &item.barcode,
        &item.serial_number,
        &item.current_holder,
    ];

    [
        item.resource_tag.to_string(),
        item.model.clone(),
        item.status.label().to_string(),
        item.status.name().to_string(),
    ]
    .into_iter()
    .chain(optional.into_iter().flatten().cloned())
    .chain(item.loan_date.map(|d| d.format("%Y-%m-%d").to_string()))
}
