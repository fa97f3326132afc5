//! CSV storage for the inventory
//!
//! Items live in `.gear/inventory.csv`, one row per item, with the Swedish
//! column headers of the shared spreadsheet. Columns may appear in
//! any order when reading; writing always uses the canonical order.
//! Uses file locking and temp-file-plus-rename writes.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{normalize, Inventory, InventoryError, Item, ItemStatus, ResourceTag};

/// Date format of the `Utlåningsdatum` column
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column headers in canonical order
const HEADERS: [&str; 11] = [
    "Enhetsfoto",
    "Modell",
    "Tillverkare",
    "Typ",
    "Färg",
    "Resurstagg",
    "Streckkod",
    "Serienummer",
    "Status",
    "Aktuell ägare",
    "Utlåningsdatum",
];

/// One row of the data file; field order matches [`HEADERS`]
#[derive(Debug, Serialize, Deserialize)]
struct ItemRecord {
    #[serde(rename = "Enhetsfoto", default)]
    photo: String,
    #[serde(rename = "Modell", default)]
    model: String,
    #[serde(rename = "Tillverkare", default)]
    manufacturer: String,
    #[serde(rename = "Typ", default)]
    item_type: String,
    #[serde(rename = "Färg", default)]
    color: String,
    #[serde(rename = "Resurstagg")]
    resource_tag: String,
    #[serde(rename = "Streckkod", default)]
    barcode: String,
    #[serde(rename = "Serienummer", default)]
    serial_number: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "Aktuell ägare", default)]
    current_holder: String,
    #[serde(rename = "Utlåningsdatum", default)]
    loan_date: String,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            photo: text(&item.photo_ref),
            model: item.model.clone(),
            manufacturer: text(&item.manufacturer),
            item_type: text(&item.item_type),
            color: text(&item.color),
            resource_tag: item.resource_tag.to_string(),
            barcode: text(&item.barcode),
            serial_number: text(&item.serial_number),
            status: item.status.label().to_string(),
            current_holder: text(&item.current_holder),
            loan_date: item
                .loan_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = anyhow::Error;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let tag = ResourceTag::new(&record.resource_tag)?;
        let mut item = Item::new(tag, record.model)?;

        item.photo_ref = normalize(Some(&record.photo));
        item.manufacturer = normalize(Some(&record.manufacturer));
        item.item_type = normalize(Some(&record.item_type));
        item.color = normalize(Some(&record.color));
        item.barcode = normalize(Some(&record.barcode));
        item.serial_number = normalize(Some(&record.serial_number));
        item.current_holder = normalize(Some(&record.current_holder));

        item.status = match record.status.trim() {
            "" => ItemStatus::Available,
            status => status.parse().map_err(anyhow::Error::msg)?,
        };
        item.loan_date = match record.loan_date.trim() {
            "" => None,
            date => Some(
                NaiveDate::parse_from_str(date, DATE_FORMAT)
                    .with_context(|| format!("Invalid loan date '{}'", date))?,
            ),
        };

        Ok(item)
    }
}

/// Store for inventory data in CSV format
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full inventory; a missing file is an empty inventory
    pub fn load(&self) -> Result<Inventory, InventoryError> {
        let inventory = self.read_all().map_err(InventoryError::Persistence)?;
        tracing::debug!(path = %self.path.display(), count = inventory.len(), "loaded inventory");
        Ok(inventory)
    }

    /// Overwrites the data file with the given snapshot
    pub fn save(&self, inventory: &Inventory) -> Result<(), InventoryError> {
        self.write_all(inventory.items())
            .map_err(InventoryError::Persistence)?;
        tracing::debug!(path = %self.path.display(), count = inventory.len(), "saved inventory");
        Ok(())
    }

    /// Writes a dated backup copy into `dir` and returns its path
    pub fn export(
        &self,
        inventory: &Inventory,
        dir: &Path,
        date: NaiveDate,
    ) -> Result<PathBuf, InventoryError> {
        let path = dir.join(backup_file_name(date));
        InventoryStore::new(&path)
            .write_all(inventory.items())
            .map_err(InventoryError::Persistence)?;
        tracing::debug!(path = %path.display(), "exported inventory backup");
        Ok(path)
    }

    fn read_all(&self) -> Result<Inventory> {
        if !self.path.exists() {
            return Ok(Inventory::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open inventory: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on inventory")?;

        let items = read_items(BufReader::new(&file))
            .with_context(|| format!("Failed to read inventory: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Inventory::from_items(items)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Inconsistent inventory: {}", self.path.display()))
    }

    fn write_all(&self, items: &[Item]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first, then rename over the data file
        let temp_path = self.path.with_extension("csv.tmp");
        let result = write_temp(&temp_path, items).and_then(|()| {
            fs::rename(&temp_path, &self.path).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            })
        });

        if result.is_err() && temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_temp(temp_path: &Path, items: &[Item]) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    // Lock is released when file is dropped
    file.lock_exclusive()
        .context("Failed to acquire write lock on inventory")?;

    let mut writer = BufWriter::new(&file);
    write_items(&mut writer, items)?;
    writer.flush().context("Failed to flush inventory")
}

/// File name of a backup taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("inventarie_backup_{}.csv", date.format(DATE_FORMAT))
}

/// Serializes items to CSV text with the canonical header row
pub fn to_csv_string(items: &[Item]) -> Result<String, InventoryError> {
    let mut buffer = Vec::new();
    write_items(&mut buffer, items).map_err(InventoryError::Persistence)?;
    String::from_utf8(buffer)
        .context("Inventory CSV is not valid UTF-8")
        .map_err(InventoryError::Persistence)
}

fn read_items<R: std::io::Read>(reader: R) -> Result<Vec<Item>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut items = Vec::new();

    for (index, record) in reader.deserialize::<ItemRecord>().enumerate() {
        let row = index + 1;
        let record = record.with_context(|| format!("Failed to parse row {}", row))?;
        let item = Item::try_from(record).with_context(|| format!("Invalid item at row {}", row))?;
        items.push(item);
    }

    Ok(items)
}

fn write_items<W: Write>(writer: W, items: &[Item]) -> Result<()> {
    // Header is written by hand so an empty inventory still gets one
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(HEADERS).context("Failed to write header")?;

    for item in items {
        writer
            .serialize(ItemRecord::from(item))
            .with_context(|| format!("Failed to write item {}", item.resource_tag))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
