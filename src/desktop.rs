// Tauri adapter: implements the host traits on an AppHandle, renders the
// menu tree natively and exposes the custom list to the frontend.

use std::path::PathBuf;
use std::sync::Arc;

use tauri::menu::{Menu, MenuBuilder, MenuItem, MenuItemBuilder, PredefinedMenuItem, Submenu, SubmenuBuilder};
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, State, WebviewUrl, WebviewWindowBuilder, Wry};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_opener::OpenerExt;
use url::Url;

use crate::modules::custom_store::CustomEntry;
use crate::modules::host::{ExternalOpener, FileDialogs, MenuPresenter, Notifier, WebViewBridge, WindowLayout};
use crate::modules::layout::{self, Frame};
use crate::modules::menu_tree::{self, MenuNode, MenuTree, Predefined};
use crate::modules::persist::ConfigPaths;
use crate::settings::Settings;
use crate::state::{AppState, PRODUCT_NAME};

const MAIN_WINDOW: &str = "main";

/// Host implementation backed by the running Tauri app.
#[derive(Clone)]
pub struct TauriHost {
    app: AppHandle,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn eval(&self, js: &str) {
        // Invariant: all provider pages load in the main window
        if let Some(window) = self.app.get_webview_window(MAIN_WINDOW) {
            if let Err(e) = window.eval(js) {
                log::error!("[Shell] Script failed: {}", e);
            }
        }
    }

    fn apply_frame(&self, place: impl FnOnce(Frame) -> Frame, on_top: bool) -> tauri::Result<()> {
        let Some(window) = self.app.get_webview_window(MAIN_WINDOW) else {
            return Ok(());
        };
        let Some(monitor) = window.current_monitor()? else {
            return Ok(());
        };

        let scale = monitor.scale_factor();
        let size = monitor.size().to_logical::<f64>(scale);
        let origin = monitor.position().to_logical::<f64>(scale);
        let frame = place(Frame {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        });

        window.set_always_on_top(on_top)?;
        window.set_size(LogicalSize::new(frame.width, frame.height))?;
        window.set_position(LogicalPosition::new(frame.x, frame.y))?;
        Ok(())
    }
}

impl MenuPresenter for TauriHost {
    fn install(&self, tree: &MenuTree) {
        let app = self.app.clone();
        let tree = tree.clone();
        // Native menus are owned by the UI thread
        let scheduled = self.app.run_on_main_thread(move || {
            match build_native_menu(&app, &tree).and_then(|menu| app.set_menu(menu)) {
                Ok(_) => log::debug!("[Menu] Installed application menu"),
                Err(e) => log::error!("[Menu] Failed to install menu: {}", e),
            }
        });
        if let Err(e) = scheduled {
            log::error!("[Menu] Failed to schedule menu install: {}", e);
        }
    }
}

impl WebViewBridge for TauriHost {
    fn execute_script(&self, code: &str) {
        self.eval(code);
    }

    fn reload(&self) {
        self.eval("window.location.reload()");
    }
}

impl ExternalOpener for TauriHost {
    fn open_url(&self, url: &str) {
        if let Err(e) = self.app.opener().open_url(url, None::<&str>) {
            log::error!("[Shell] Could not open {} externally: {}", url, e);
        }
    }
}

impl FileDialogs for TauriHost {
    fn pick_open_file(&self) -> Option<PathBuf> {
        self.app
            .dialog()
            .file()
            .set_title("Import Custom Platforms")
            .add_filter("JSON", &["json"])
            .blocking_pick_file()
            .and_then(|path| path.into_path().ok())
    }

    fn pick_save_file(&self, default_name: &str) -> Option<PathBuf> {
        self.app
            .dialog()
            .file()
            .set_title("Export Custom Platforms")
            .set_file_name(default_name)
            .add_filter("JSON", &["json"])
            .blocking_save_file()
            .and_then(|path| path.into_path().ok())
    }
}

impl Notifier for TauriHost {
    fn show_message(&self, title: &str, text: &str) {
        self.app.dialog().message(text).title(title).show(|_| {});
    }
}

impl WindowLayout for TauriHost {
    fn sidebar_mode(&self, width: f64) {
        if let Err(e) = self.apply_frame(|monitor| layout::sidebar_frame(monitor, width), true) {
            log::error!("[Shell] Sidebar mode failed: {}", e);
        }
    }

    fn window_mode(&self, width: f64, height: f64) {
        if let Err(e) = self.apply_frame(|monitor| layout::centered_frame(monitor, width, height), false) {
            log::error!("[Shell] Window mode failed: {}", e);
        }
    }
}

fn build_native_menu(app: &AppHandle, tree: &MenuTree) -> tauri::Result<Menu<Wry>> {
    let mut builder = MenuBuilder::new(app);
    for node in &tree.nodes {
        builder = match node {
            MenuNode::Submenu(sub) => builder.item(&build_submenu(app, sub)?),
            MenuNode::Item(item) => builder.item(&build_item(app, item)?),
            MenuNode::Predefined(kind) => builder.item(&build_predefined(app, *kind)?),
            MenuNode::Separator => builder.separator(),
        };
    }
    builder.build()
}

fn build_submenu(app: &AppHandle, sub: &menu_tree::Submenu) -> tauri::Result<Submenu<Wry>> {
    let mut builder = SubmenuBuilder::new(app, &sub.title);
    for node in &sub.children {
        builder = match node {
            MenuNode::Submenu(child) => builder.item(&build_submenu(app, child)?),
            MenuNode::Item(item) => builder.item(&build_item(app, item)?),
            MenuNode::Predefined(kind) => builder.item(&build_predefined(app, *kind)?),
            MenuNode::Separator => builder.separator(),
        };
    }
    builder.build()
}

fn build_item(app: &AppHandle, item: &menu_tree::MenuItem) -> tauri::Result<MenuItem<Wry>> {
    let mut builder = MenuItemBuilder::with_id(item.id.clone(), &item.label);
    if let Some(accelerator) = item.accelerator {
        builder = builder.accelerator(accelerator);
    }
    builder.build(app)
}

fn build_predefined(app: &AppHandle, kind: Predefined) -> tauri::Result<Submenu<Wry>> {
    let about = format!("About {}", PRODUCT_NAME);
    let quit = format!("Quit {}", PRODUCT_NAME);
    match kind {
        Predefined::App => SubmenuBuilder::new(app, PRODUCT_NAME)
            .item(&PredefinedMenuItem::about(app, Some(about.as_str()), None)?)
            .separator()
            .item(&PredefinedMenuItem::hide(app, None)?)
            .item(&PredefinedMenuItem::hide_others(app, None)?)
            .item(&PredefinedMenuItem::show_all(app, None)?)
            .separator()
            .item(&PredefinedMenuItem::quit(app, Some(quit.as_str()))?)
            .build(),
        Predefined::Edit => SubmenuBuilder::new(app, "Edit")
            .item(&PredefinedMenuItem::undo(app, Some("Undo"))?)
            .item(&PredefinedMenuItem::redo(app, Some("Redo"))?)
            .separator()
            .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
            .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
            .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
            .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
            .build(),
    }
}

fn handle_menu_event(app: &AppHandle, id: &str) {
    let state = app.state::<Arc<AppState>>().inner().clone();
    let Some(action) = state.menu().action(id).cloned() else {
        // Predefined items are handled by the platform
        return;
    };
    let host = TauriHost::new(app.clone());

    if action.needs_worker() {
        // Blocking dialogs deadlock on the UI thread
        std::thread::spawn(move || {
            state.run_action(&action, &host);
        });
    } else {
        state.run_action(&action, &host);
    }
}

#[tauri::command]
fn read_menu(state: State<'_, Arc<AppState>>) -> Vec<CustomEntry> {
    state.read_custom()
}

#[tauri::command]
fn edit_menu(app: AppHandle, state: State<'_, Arc<AppState>>, entries: Vec<CustomEntry>) -> Result<(), String> {
    state.edit(&entries, &TauriHost::new(app)).map_err(|e| e.to_string())
}

#[tauri::command]
fn import_menu(app: AppHandle, state: State<'_, Arc<AppState>>, path: PathBuf) -> Result<Vec<CustomEntry>, String> {
    state.import_from(&path, &TauriHost::new(app)).map_err(|e| e.to_string())
}

#[tauri::command]
fn export_menu(state: State<'_, Arc<AppState>>, path: PathBuf) -> Result<usize, String> {
    state.export_to(&path).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_settings(state: State<'_, Arc<AppState>>) -> Settings {
    state.settings()
}

#[tauri::command]
fn save_settings(state: State<'_, Arc<AppState>>, settings: Settings) -> Result<(), String> {
    state.save_settings(settings).map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            if let Some(window) = app.get_webview_window(MAIN_WINDOW) {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_log::Builder::default().level(log_level).build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let paths = ConfigPaths::new(app.path().app_config_dir()?);
            log::info!("[Shell] Config directory: {:?}", paths.root());

            let state = Arc::new(AppState::open(paths));
            app.manage(state.clone());

            let start = match state.startup_url().and_then(|u| Url::parse(&u).ok()) {
                Some(url) => WebviewUrl::External(url),
                None => WebviewUrl::App("index.html".into()),
            };
            let settings = state.settings();
            WebviewWindowBuilder::new(app, MAIN_WINDOW, start)
                .title(PRODUCT_NAME)
                .inner_size(settings.window_width, settings.window_height)
                .center()
                .build()?;

            state.rebuild(&TauriHost::new(app.handle().clone()));
            Ok(())
        })
        .on_menu_event(|app, event| handle_menu_event(app, event.id().0.as_str()))
        .invoke_handler(tauri::generate_handler![
            read_menu,
            edit_menu,
            import_menu,
            export_menu,
            get_settings,
            save_settings
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
