// Pure logic modules - no Tauri imports
pub mod catalog;        // Built-in provider catalog
pub mod custom_store;   // User-editable custom platforms
pub mod host;           // Collaborator traits the native shell implements
pub mod last_page;      // Last visited page
pub mod layout;         // Sidebar / window geometry
pub mod menu_tree;      // Menu assembly
pub mod persist;        // Whole-file writes, config paths
pub mod router;         // Click routing
pub mod updater;        // Release check
