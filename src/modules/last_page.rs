use std::path::PathBuf;

use crate::error::StoreError;
use crate::modules::persist;

pub const LAST_PAGE_FILE: &str = "last_page.txt";

/// The most recent in-shell navigation target. No history, one value.
pub struct LastPageStore {
    path: PathBuf,
}

impl LastPageStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn write(&self, url: &str) -> Result<(), StoreError> {
        persist::write_atomic(&self.path, url.as_bytes())
    }

    /// Returns the stored URL, or `None` when nothing usable was recorded.
    pub fn read(&self) -> Option<String> {
        match persist::read_if_exists(&self.path) {
            Ok(Some(bytes)) => {
                let url = String::from_utf8_lossy(&bytes).trim().to_string();
                (!url.is_empty()).then_some(url)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("[LastPage] {}", e);
                None
            }
        }
    }
}
