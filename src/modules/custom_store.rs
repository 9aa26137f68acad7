// User-editable custom platform list - persistence layer.
// Pattern: whole-list replace, tmp + rename writes (see persist.rs).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;
use crate::modules::persist;

/// Backing file name inside the configuration directory.
pub const MENU_FILE: &str = "menu.json";

/// Group that collects entries without an explicit group.
pub const DEFAULT_GROUP: &str = "Default Group";

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

// Hand-edited files carry `null` for fields they mean to leave unset.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user-maintained menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEntry {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub separator: bool,
    /// A `null` group reads as blank and folds into the default group.
    #[serde(default = "default_group", deserialize_with = "null_as_default")]
    pub group: String,
}

impl CustomEntry {
    /// Group this entry is listed under. Blank group names fold into the default group.
    pub fn group_name(&self) -> &str {
        if self.group.trim().is_empty() {
            DEFAULT_GROUP
        } else {
            &self.group
        }
    }

    /// Entry written on first run so the custom menu is never a mystery.
    pub fn demo() -> Self {
        Self {
            id: "1".to_string(),
            label: "Custom Demo".to_string(),
            url: "https://www.google.com".to_string(),
            priority: 0,
            separator: false,
            group: default_group(),
        }
    }
}

/// Default file name offered when exporting, e.g. `menu20240131_094502.json`.
pub fn default_export_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("menu{}.json", now.format("%Y%m%d_%H%M%S"))
}

pub struct CustomEntryStore {
    path: PathBuf,
}

impl CustomEntryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry.
    ///
    /// A missing file is a first run: the demo entry is written and returned.
    /// Unreadable or malformed files yield an empty list and stay untouched on
    /// disk for manual recovery.
    pub fn read_all(&self) -> Vec<CustomEntry> {
        let bytes = match persist::read_if_exists(&self.path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("[CustomMenu] {:?} does not exist, writing demo entry", self.path);
                let entries = vec![CustomEntry::demo()];
                if let Err(e) = self.write_all(&entries) {
                    log::debug!("[CustomMenu] Showing unsaved demo entry: {}", e);
                }
                return entries;
            }
            Err(e) => {
                log::error!("[CustomMenu] {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(source) => {
                let e = StoreError::Parse {
                    path: self.path.clone(),
                    source,
                };
                log::error!("[CustomMenu] {}, showing no custom entries", e);
                Vec::new()
            }
        }
    }

    /// Replaces the whole list on disk.
    pub fn write_all(&self, entries: &[CustomEntry]) -> Result<(), StoreError> {
        let result = serialize(entries).and_then(|json| persist::write_atomic(&self.path, &json));
        match &result {
            Ok(()) => log::info!("[CustomMenu] Saved {} entries", entries.len()),
            Err(e) => log::error!("[CustomMenu] {}", e),
        }
        result
    }

    /// Replaces the store with the entries in `source`.
    ///
    /// All-or-nothing: if the file cannot be read or parsed, the store is left
    /// exactly as it was.
    pub fn import(&self, source: &Path) -> Result<Vec<CustomEntry>, StoreError> {
        let result = read_entries(source).and_then(|entries| {
            self.write_all(&entries)?;
            Ok(entries)
        });
        match &result {
            Ok(entries) => log::info!("[CustomMenu] Imported {} entries from {:?}", entries.len(), source),
            Err(e) => log::warn!("[CustomMenu] Import aborted: {}", e),
        }
        result
    }

    /// Writes `entries` to a caller-chosen file. The store itself is not touched.
    pub fn export(&self, destination: &Path, entries: &[CustomEntry]) -> Result<(), StoreError> {
        let json = serialize(entries)?;
        fs::write(destination, json).map_err(|source| StoreError::Write {
            path: destination.to_path_buf(),
            source,
        })?;
        log::info!("[CustomMenu] Exported {} entries to {:?}", entries.len(), destination);
        Ok(())
    }
}

fn serialize(entries: &[CustomEntry]) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(entries)?)
}

fn read_entries(source: &Path) -> Result<Vec<CustomEntry>, StoreError> {
    let bytes = fs::read(source).map_err(|e| StoreError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Parse {
        path: source.to_path_buf(),
        source: e,
    })
}
