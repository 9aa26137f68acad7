// Application context shared by the menu callbacks and the Tauri commands.
// Everything a rebuild or a dispatch needs is reached through this value,
// never through globals, so both stay functions of (catalog, entries, context).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Local;

use crate::error::StoreError;
use crate::modules::catalog::{self, Category};
use crate::modules::custom_store::{default_export_name, CustomEntry, CustomEntryStore, MENU_FILE};
use crate::modules::host::{Host, MenuPresenter};
use crate::modules::last_page::{LastPageStore, LAST_PAGE_FILE};
use crate::modules::menu_tree::{self, MenuAction, MenuContext, MenuTree};
use crate::modules::persist::ConfigPaths;
use crate::modules::router::{self, Route};
use crate::modules::updater::{self, GithubReleases, ReleaseSource, UpdateStatus};
use crate::settings::Settings;

pub const PRODUCT_NAME: &str = "ChatFusion";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of running one menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Routed(Route),
    Done,
    Imported(usize),
    Exported(PathBuf),
    Cancelled,
    Failed,
}

pub struct AppState {
    paths: ConfigPaths,
    ctx: MenuContext,
    catalog: Vec<Category>,
    // Held across every read/modify/write of menu.json; dialog-driven actions run off the UI thread.
    store: Mutex<CustomEntryStore>,
    last_page: LastPageStore,
    settings: RwLock<Settings>,
    menu: RwLock<MenuTree>,
    generation: AtomicU64,
    releases: Box<dyn ReleaseSource + Send + Sync>,
}

impl AppState {
    pub fn new(
        paths: ConfigPaths,
        catalog: Vec<Category>,
        ctx: MenuContext,
        releases: Box<dyn ReleaseSource + Send + Sync>,
    ) -> Self {
        let settings = Settings::load(&paths);
        Self {
            store: Mutex::new(CustomEntryStore::new(paths.path(MENU_FILE))),
            last_page: LastPageStore::new(paths.path(LAST_PAGE_FILE)),
            settings: RwLock::new(settings),
            menu: RwLock::new(MenuTree::default()),
            generation: AtomicU64::new(0),
            paths,
            ctx,
            catalog,
            releases,
        }
    }

    /// Context for the running application: packaged catalog, GitHub release feed.
    pub fn open(paths: ConfigPaths) -> Self {
        let feed = Settings::load(&paths).release_feed;
        Self::new(
            paths,
            catalog::built_in(),
            MenuContext::current(),
            Box::new(GithubReleases::new(feed)),
        )
    }

    fn store(&self) -> MutexGuard<'_, CustomEntryStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn save_settings(&self, settings: Settings) -> Result<(), StoreError> {
        settings.save(&self.paths)?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    /// The currently installed menu.
    pub fn menu(&self) -> MenuTree {
        self.menu.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn read_custom(&self) -> Vec<CustomEntry> {
        self.store().read_all()
    }

    /// Builds the menu from scratch and hands it to the presenter.
    pub fn rebuild<P: MenuPresenter + ?Sized>(&self, presenter: &P) -> MenuTree {
        let entries = self.read_custom();
        let ctx = MenuContext {
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
            ..self.ctx.clone()
        };
        let tree = menu_tree::build(&self.catalog, &entries, &ctx);
        *self.menu.write().unwrap_or_else(PoisonError::into_inner) = tree.clone();
        presenter.install(&tree);
        log::debug!("[Menu] Rebuilt with {} items", tree.items().count());
        tree
    }

    /// Replaces the custom list and rebuilds the menu.
    pub fn edit<P: MenuPresenter + ?Sized>(&self, entries: &[CustomEntry], presenter: &P) -> Result<(), StoreError> {
        self.store().write_all(entries)?;
        self.rebuild(presenter);
        Ok(())
    }

    pub fn import_from<P: MenuPresenter + ?Sized>(
        &self,
        source: &Path,
        presenter: &P,
    ) -> Result<Vec<CustomEntry>, StoreError> {
        let entries = self.store().import(source)?;
        self.rebuild(presenter);
        Ok(entries)
    }

    /// Exports the current custom list. Returns the number of entries written.
    pub fn export_to(&self, destination: &Path) -> Result<usize, StoreError> {
        let store = self.store();
        let entries = store.read_all();
        store.export(destination, &entries)?;
        Ok(entries.len())
    }

    /// Where the main view should open on launch.
    pub fn startup_url(&self) -> Option<String> {
        if self.settings().restore_last_page {
            self.last_page.read()
        } else {
            None
        }
    }

    /// Runs the action bound to a clicked menu item. `None` for unknown ids.
    pub fn handle<H: Host + ?Sized>(&self, id: &str, host: &H) -> Option<Outcome> {
        let action = self.menu.read().unwrap_or_else(PoisonError::into_inner).action(id).cloned();
        match action {
            Some(action) => Some(self.run_action(&action, host)),
            None => {
                log::debug!("[Menu] No action bound to '{}'", id);
                None
            }
        }
    }

    pub fn run_action<H: Host + ?Sized>(&self, action: &MenuAction, host: &H) -> Outcome {
        let settings = self.settings();
        match action {
            MenuAction::Open(selection) => Outcome::Routed(router::dispatch(selection, host, host, &self.last_page)),
            MenuAction::OpenSettings => {
                host.execute_script(&router::navigate_script(&settings.settings_page));
                host.reload();
                Outcome::Done
            }
            MenuAction::SidebarMode => {
                host.sidebar_mode(settings.sidebar_width);
                Outcome::Done
            }
            MenuAction::WindowMode => {
                host.window_mode(settings.window_width, settings.window_height);
                Outcome::Done
            }
            MenuAction::ImportCustom => {
                let Some(source) = host.pick_open_file() else {
                    return Outcome::Cancelled;
                };
                match self.import_from(&source, host) {
                    Ok(entries) => Outcome::Imported(entries.len()),
                    Err(_) => Outcome::Failed,
                }
            }
            MenuAction::ExportCustom => {
                let Some(destination) = host.pick_save_file(&default_export_name(&Local::now())) else {
                    return Outcome::Cancelled;
                };
                match self.export_to(&destination) {
                    Ok(_) => Outcome::Exported(destination),
                    Err(e) => {
                        log::error!("[CustomMenu] Export failed: {}", e);
                        Outcome::Failed
                    }
                }
            }
            MenuAction::About => {
                let text = format!("{} {}\n\n{}", PRODUCT_NAME, VERSION, settings.repository_url);
                host.show_message("About", &text);
                Outcome::Done
            }
            MenuAction::OpenRepository => {
                host.open_url(&settings.repository_url);
                Outcome::Done
            }
            MenuAction::CheckForUpdates => match updater::check(self.releases.as_ref(), VERSION) {
                Ok(UpdateStatus::Available(release)) => {
                    let text = format!("{} {} is available.", PRODUCT_NAME, release.tag_name);
                    host.show_message("Update Available", &text);
                    host.open_url(&release.html_url);
                    Outcome::Done
                }
                Ok(UpdateStatus::UpToDate) => {
                    host.show_message("Check for Updates", "You are running the latest version.");
                    Outcome::Done
                }
                Err(e) => {
                    log::warn!("[Updater] {}", e);
                    host.show_message("Check for Updates", "Could not reach the release feed.");
                    Outcome::Failed
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::ProviderEntry;
    use crate::modules::custom_store::DEFAULT_GROUP;
    use crate::modules::host::testing::{Call, RecordingHost};
    use crate::modules::menu_tree::{Selection, CUSTOM_MENU_TITLE};
    use crate::modules::updater::testing::FixedRelease;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn catalog() -> Vec<Category> {
        let provider = |id: &str, label: &str| ProviderEntry {
            id: id.to_string(),
            label: label.to_string(),
            url: format!("https://{}.example/", label.to_lowercase()),
            priority: 0,
            separator: false,
        };
        vec![Category {
            id: "10000".to_string(),
            title: "International".to_string(),
            priority: 0,
            entries: vec![provider("10100", "Inline"), provider("10600", "Outside")],
        }]
    }

    fn state_with(release: Option<&'static str>) -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let state = AppState::new(
            ConfigPaths::new(dir.path()),
            catalog(),
            MenuContext::default(),
            Box::new(FixedRelease(release)),
        );
        (dir, state)
    }

    fn id_of(state: &AppState, label: &str) -> String {
        state.menu().items().find(|i| i.label == label).unwrap().id.clone()
    }

    fn entry(id: &str, group: &str) -> CustomEntry {
        CustomEntry {
            id: id.to_string(),
            label: format!("Entry {}", id),
            url: format!("https://{}.example/", id),
            priority: 0,
            separator: false,
            group: group.to_string(),
        }
    }

    #[test]
    fn test_first_rebuild_shows_demo_entry() {
        let (dir, state) = state_with(None);
        let host = RecordingHost::default();

        let tree = state.rebuild(&host);

        assert!(dir.path().join(MENU_FILE).exists());
        let custom = tree.submenu(CUSTOM_MENU_TITLE).unwrap();
        assert_eq!(custom.children.len(), 1);
        assert_eq!(host.calls().len(), 1);
        assert!(matches!(host.calls()[0], Call::Install(_)));
    }

    #[test]
    fn test_edit_persists_and_reinstalls() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.rebuild(&host);

        state.edit(&[entry("a", "Work"), entry("b", "")], &host).unwrap();

        assert_eq!(state.read_custom().len(), 2);
        assert_eq!(host.calls().iter().filter(|c| matches!(c, Call::Install(_))).count(), 2);
        let id = id_of(&state, "Entry b");
        assert!(matches!(
            state.menu().action(&id),
            Some(MenuAction::Open(Selection::Custom(c))) if c.id == "b"
        ));
    }

    #[test]
    fn test_click_routes_in_shell_and_records_last_page() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.rebuild(&host);

        let outcome = state.handle(&id_of(&state, "Inline"), &host);

        assert_eq!(outcome, Some(Outcome::Routed(Route::InShell)));
        assert_eq!(state.startup_url().as_deref(), Some("https://inline.example/"));
    }

    #[test]
    fn test_click_external_only_opens_browser() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.rebuild(&host);

        let outcome = state.handle(&id_of(&state, "Outside"), &host);

        assert_eq!(outcome, Some(Outcome::Routed(Route::External)));
        assert!(host.calls().contains(&Call::OpenUrl("https://outside.example/".to_string())));
        assert_eq!(state.startup_url(), None);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.rebuild(&host);

        assert_eq!(state.handle("g1/builtin:9:9", &host), None);
    }

    #[test]
    fn test_item_from_replaced_menu_is_ignored() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.edit(&[entry("a", ""), entry("b", "")], &host).unwrap();
        let stale = id_of(&state, "Entry b");

        state.edit(&[entry("c", ""), entry("d", "")], &host).unwrap();

        assert_eq!(state.handle(&stale, &host), None);
        assert_eq!(state.startup_url(), None);
        assert_eq!(
            state.handle(&id_of(&state, "Entry d"), &host),
            Some(Outcome::Routed(Route::InShell))
        );
        assert_eq!(state.startup_url().as_deref(), Some("https://d.example/"));
    }

    #[test]
    fn test_restore_disabled_hides_last_page() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.rebuild(&host);
        state.handle(&id_of(&state, "Inline"), &host);

        state
            .save_settings(Settings {
                restore_last_page: false,
                ..Settings::default()
            })
            .unwrap();

        assert_eq!(state.startup_url(), None);
    }

    #[test]
    fn test_open_settings_navigates_then_reloads() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();

        state.run_action(&MenuAction::OpenSettings, &host);

        assert_eq!(
            host.calls(),
            vec![
                Call::Script(router::navigate_script(&Settings::default().settings_page)),
                Call::Reload
            ]
        );
    }

    #[test]
    fn test_layout_actions_use_settings() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();

        state.run_action(&MenuAction::SidebarMode, &host);
        state.run_action(&MenuAction::WindowMode, &host);

        assert_eq!(host.calls(), vec![Call::Sidebar(420.0), Call::Window(1200.0, 800.0)]);
    }

    #[test]
    fn test_import_cancelled() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();

        assert_eq!(state.run_action(&MenuAction::ImportCustom, &host), Outcome::Cancelled);
        assert_eq!(host.calls(), vec![Call::PickOpen]);
    }

    #[test]
    fn test_import_from_dialog_rebuilds_menu() {
        let (dir, state) = state_with(None);
        let source = dir.path().join("incoming.json");
        fs::write(&source, serde_json::to_vec(&[entry("x", "A"), entry("y", "")]).unwrap()).unwrap();
        let host = RecordingHost {
            open_file: Some(source),
            ..RecordingHost::default()
        };

        let outcome = state.run_action(&MenuAction::ImportCustom, &host);

        assert_eq!(outcome, Outcome::Imported(2));
        let custom = state.menu();
        let custom = custom.submenu(CUSTOM_MENU_TITLE).unwrap();
        assert_eq!(custom.children.len(), 3);
    }

    #[test]
    fn test_failed_import_keeps_store_and_menu() {
        let (dir, state) = state_with(None);
        let host = RecordingHost::default();
        state.edit(&[entry("keep", DEFAULT_GROUP)], &host).unwrap();
        let menu_path = dir.path().join(MENU_FILE);
        let before = fs::read(&menu_path).unwrap();
        let source = dir.path().join("broken.json");
        fs::write(&source, "[{]").unwrap();
        let host = RecordingHost {
            open_file: Some(source),
            ..RecordingHost::default()
        };

        assert_eq!(state.run_action(&MenuAction::ImportCustom, &host), Outcome::Failed);
        assert_eq!(fs::read(&menu_path).unwrap(), before);
        assert_eq!(host.calls(), vec![Call::PickOpen]);
    }

    #[test]
    fn test_export_offers_timestamped_name() {
        let (dir, state) = state_with(None);
        let destination = dir.path().join("out.json");
        let host = RecordingHost {
            save_file: Some(destination.clone()),
            ..RecordingHost::default()
        };

        let outcome = state.run_action(&MenuAction::ExportCustom, &host);

        assert_eq!(outcome, Outcome::Exported(destination.clone()));
        match &host.calls()[0] {
            Call::PickSave(name) => {
                assert!(name.starts_with("menu") && name.ends_with(".json"));
                assert_eq!(name.len(), "menu20240131_094502.json".len());
            }
            other => panic!("unexpected call {:?}", other),
        }
        let exported: Vec<CustomEntry> = serde_json::from_slice(&fs::read(&destination).unwrap()).unwrap();
        assert_eq!(exported, state.read_custom());
    }

    #[test]
    fn test_about_and_repository() {
        let (_dir, state) = state_with(None);
        let host = RecordingHost::default();

        state.run_action(&MenuAction::About, &host);
        state.run_action(&MenuAction::OpenRepository, &host);

        let calls = host.calls();
        match &calls[0] {
            Call::Message(title, text) => {
                assert_eq!(title, "About");
                assert!(text.contains(VERSION));
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(calls[1], Call::OpenUrl(Settings::default().repository_url));
    }

    #[test]
    fn test_update_available_opens_release_page() {
        let (_dir, state) = state_with(Some("v99.0.0"));
        let host = RecordingHost::default();

        assert_eq!(state.run_action(&MenuAction::CheckForUpdates, &host), Outcome::Done);

        let calls = host.calls();
        assert!(matches!(&calls[0], Call::Message(title, _) if title == "Update Available"));
        assert!(matches!(&calls[1], Call::OpenUrl(url) if url.ends_with("v99.0.0")));
    }

    #[test]
    fn test_update_check_up_to_date_and_failure() {
        let (_dir, current) = state_with(Some("v0.0.1"));
        let host = RecordingHost::default();
        assert_eq!(current.run_action(&MenuAction::CheckForUpdates, &host), Outcome::Done);
        assert_eq!(host.calls().len(), 1);

        let (_dir, offline) = state_with(None);
        let host = RecordingHost::default();
        assert_eq!(offline.run_action(&MenuAction::CheckForUpdates, &host), Outcome::Failed);
        assert!(matches!(&host.calls()[0], Call::Message(..)));
    }
}
