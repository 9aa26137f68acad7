// ChatFusion Library Entry Point
// This file exposes all modules so they can be imported by main.rs
// and tested independently.

pub mod error;
pub mod settings;

// Shared application context
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

// Tauri adapter: native menu, web view, dialogs
#[cfg(feature = "desktop")]
pub mod desktop;

#[cfg(feature = "desktop")]
pub use desktop::run;
