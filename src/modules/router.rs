// Selection routing - pure logic, no Tauri imports.
// Decides between the embedded view and the system browser for a clicked provider.

use crate::modules::host::{ExternalOpener, WebViewBridge};
use crate::modules::last_page::LastPageStore;
use crate::modules::menu_tree::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Handed to the system browser.
    External,
    /// Loaded in the embedded view and recorded as the last page.
    InShell,
}

/// Only built-in providers can be external-only; custom entries always load in the shell.
pub fn route_for(selection: &Selection) -> Route {
    match selection {
        Selection::BuiltIn(p) if p.opens_externally() => Route::External,
        _ => Route::InShell,
    }
}

/// JS statement that replaces the current page with `url`.
///
/// The URL is emitted as a JSON string literal, which is also a valid JS
/// string literal, so quotes and backslashes in user-entered URLs cannot
/// break out of the call.
pub fn navigate_script(url: &str) -> String {
    let literal = serde_json::to_string(url).unwrap_or_else(|_| "\"about:blank\"".to_string());
    format!("window.location.replace({});", literal)
}

/// Performs the navigation for a clicked provider.
pub fn dispatch<W, O>(selection: &Selection, web: &W, opener: &O, last_page: &LastPageStore) -> Route
where
    W: WebViewBridge + ?Sized,
    O: ExternalOpener + ?Sized,
{
    let url = selection.url();
    let route = route_for(selection);

    match route {
        Route::External => {
            log::info!("[Router] Opening '{}' in the system browser", selection.label());
            opener.open_url(url);
        }
        Route::InShell => {
            log::info!("[Router] Navigating to '{}'", selection.label());
            web.execute_script(&navigate_script(url));
            if let Err(e) = last_page.write(url) {
                log::warn!("[Router] Could not record last page: {}", e);
            }
        }
    }

    route
}
