// Collaborator seams between the menu core and the native shell.
// The desktop adapter implements these with Tauri; tests use recording doubles.

use std::path::PathBuf;

use crate::modules::menu_tree::MenuTree;

/// Renders a menu tree as the application menu, replacing the previous one.
pub trait MenuPresenter {
    fn install(&self, tree: &MenuTree);
}

pub trait WebViewBridge {
    fn execute_script(&self, code: &str);
    fn reload(&self);
}

pub trait ExternalOpener {
    fn open_url(&self, url: &str);
}

/// Native file pickers. `None` means the user cancelled.
pub trait FileDialogs {
    fn pick_open_file(&self) -> Option<PathBuf>;
    fn pick_save_file(&self, default_name: &str) -> Option<PathBuf>;
}

pub trait Notifier {
    fn show_message(&self, title: &str, text: &str);
}

pub trait WindowLayout {
    /// Dock the main window as a narrow sidebar.
    fn sidebar_mode(&self, width: f64);
    /// Restore a regular centered window.
    fn window_mode(&self, width: f64, height: f64);
}

/// Everything a menu action may touch.
pub trait Host:
    MenuPresenter + WebViewBridge + ExternalOpener + FileDialogs + Notifier + WindowLayout
{
}

impl<T> Host for T where
    T: MenuPresenter + WebViewBridge + ExternalOpener + FileDialogs + Notifier + WindowLayout
{
}
