use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::modules::persist::{self, ConfigPaths};

pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_RELEASE_FEED: &str = "https://api.github.com/repos/chat-fusion/chat-fusion/releases/latest";
pub const DEFAULT_REPOSITORY: &str = "https://github.com/chat-fusion/chat-fusion";

/// Origin the bundled frontend is served from. Windows webviews use http.
pub const FRONTEND_PAGE: &str = if cfg!(windows) {
    "http://tauri.localhost/"
} else {
    "tauri://localhost/"
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where "Open Settings" navigates: the shell's own frontend page.
    pub settings_page: String,
    /// Reopen the last visited provider on launch.
    pub restore_last_page: bool,
    pub sidebar_width: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub release_feed: String,
    pub repository_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            settings_page: FRONTEND_PAGE.to_string(),
            restore_last_page: true,
            sidebar_width: 420.0,
            window_width: 1200.0,
            window_height: 800.0,
            release_feed: DEFAULT_RELEASE_FEED.to_string(),
            repository_url: DEFAULT_REPOSITORY.to_string(),
        }
    }
}

impl Settings {
    pub fn load(paths: &ConfigPaths) -> Self {
        let path = paths.path(SETTINGS_FILE);
        match persist::read_if_exists(&path) {
            Ok(Some(content)) => serde_json::from_slice(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("[Settings] {}, returning defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, paths: &ConfigPaths) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(self)?;
        persist::write_atomic(&paths.path(SETTINGS_FILE), &json)
    }
}
