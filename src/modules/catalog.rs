// Built-in provider catalog - pure logic, no Tauri imports.
// The payload ships inside the binary and is parsed once at startup.

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

/// File name of the packaged catalog inside `resource/`.
pub const CATALOG_FILE: &str = "built_in_menu.json";

/// Providers that refuse to load inside the embedded view and must be handed
/// to the system browser instead.
pub const EXTERNAL_ONLY: &[&str] = &["10600", "20200"];

#[derive(RustEmbed)]
#[folder = "resource/"]
struct Resources;

/// A built-in provider entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub separator: bool,
}

impl ProviderEntry {
    /// True when the provider is on the external-only list.
    pub fn opens_externally(&self) -> bool {
        EXTERNAL_ONLY.contains(&self.id.as_str())
    }
}

/// A titled group of built-in providers, rendered as one submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(rename = "menu", default)]
    pub entries: Vec<ProviderEntry>,
}

/// Parses a catalog payload.
///
/// A malformed payload degrades to an empty catalog: the custom tier of the
/// menu stays usable, so startup must not fail here. Categories and their
/// entries are stably ordered by priority; equal priorities keep payload order.
pub fn load(bytes: &[u8]) -> Vec<Category> {
    let mut categories: Vec<Category> = match serde_json::from_slice(bytes) {
        Ok(c) => c,
        Err(e) => {
            log::error!("[Catalog] Failed to parse built-in menu: {}", e);
            return Vec::new();
        }
    };

    categories.sort_by_key(|c| c.priority);
    for category in &mut categories {
        category.entries.sort_by_key(|e| e.priority);
    }

    log::debug!(
        "[Catalog] Loaded {} categories, {} providers",
        categories.len(),
        categories.iter().map(|c| c.entries.len()).sum::<usize>()
    );
    categories
}

/// Loads the catalog packaged with the application.
pub fn built_in() -> Vec<Category> {
    match Resources::get(CATALOG_FILE) {
        Some(file) => load(&file.data),
        None => {
            log::error!("[Catalog] {} is missing from the bundle", CATALOG_FILE);
            Vec::new()
        }
    }
}
