// Menu assembly - pure logic, no Tauri imports.
// Merges the built-in catalog with the custom entries into one presentation tree.
// Every leaf owns a snapshot of the data it acts on, so a click always resolves
// to its own entry no matter how the toolkit hands the event back.

use indexmap::IndexMap;

use crate::modules::catalog::{Category, ProviderEntry};
use crate::modules::custom_store::{CustomEntry, DEFAULT_GROUP};

pub const CUSTOM_MENU_TITLE: &str = "Custom Platforms";
pub const SETTINGS_MENU_TITLE: &str = "Settings";
pub const HELP_MENU_TITLE: &str = "Help";

/// The record behind a provider leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    BuiltIn(ProviderEntry),
    Custom(CustomEntry),
}

impl Selection {
    pub fn label(&self) -> &str {
        match self {
            Self::BuiltIn(p) => &p.label,
            Self::Custom(c) => &c.label,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::BuiltIn(p) => &p.url,
            Self::Custom(c) => &c.url,
        }
    }
}

/// What happens when a menu item is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Open(Selection),
    OpenSettings,
    SidebarMode,
    WindowMode,
    ImportCustom,
    ExportCustom,
    About,
    OpenRepository,
    CheckForUpdates,
}

impl MenuAction {
    /// Actions that wait on a dialog or the network and must not run on the UI thread.
    pub fn needs_worker(&self) -> bool {
        matches!(self, Self::ImportCustom | Self::ExportCustom | Self::CheckForUpdates)
    }
}

/// Submenus the platform provides itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predefined {
    App,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub accelerator: Option<&'static str>,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub title: String,
    pub children: Vec<MenuNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Submenu(Submenu),
    Item(MenuItem),
    Separator,
    Predefined(Predefined),
}

/// Inputs to the build that come from the running shell rather than the data.
#[derive(Debug, Clone, Default)]
pub struct MenuContext {
    /// Prepend the platform application and edit menus (macOS).
    pub platform_menus: bool,
    /// Rebuild counter baked into data-derived ids, so an item from a menu
    /// that is still on screen never resolves against a newer tree.
    pub generation: u64,
}

impl MenuContext {
    pub fn current() -> Self {
        Self {
            platform_menus: cfg!(target_os = "macos"),
            generation: 0,
        }
    }
}

/// The assembled application menu. Read-only; rebuilt in full on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    pub nodes: Vec<MenuNode>,
}

impl MenuTree {
    /// All items, depth first, in display order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> + '_ {
        let mut out = Vec::new();
        collect_items(&self.nodes, &mut out);
        out.into_iter()
    }

    /// Resolves a clicked item id to its bound action.
    pub fn action(&self, id: &str) -> Option<&MenuAction> {
        self.items().find(|item| item.id == id).map(|item| &item.action)
    }

    /// Top-level submenu by title.
    pub fn submenu(&self, title: &str) -> Option<&Submenu> {
        self.nodes.iter().find_map(|node| match node {
            MenuNode::Submenu(s) if s.title == title => Some(s),
            _ => None,
        })
    }
}

fn collect_items<'a>(nodes: &'a [MenuNode], out: &mut Vec<&'a MenuItem>) {
    for node in nodes {
        match node {
            MenuNode::Item(item) => out.push(item),
            MenuNode::Submenu(sub) => collect_items(&sub.children, out),
            MenuNode::Separator | MenuNode::Predefined(_) => {}
        }
    }
}

fn item(id: impl Into<String>, label: &str, accelerator: Option<&'static str>, action: MenuAction) -> MenuNode {
    MenuNode::Item(MenuItem {
        id: id.into(),
        label: label.to_string(),
        accelerator,
        action,
    })
}

fn submenu(title: &str, children: Vec<MenuNode>) -> MenuNode {
    MenuNode::Submenu(Submenu {
        title: title.to_string(),
        children,
    })
}

/// Builds the full application menu.
pub fn build(categories: &[Category], custom: &[CustomEntry], ctx: &MenuContext) -> MenuTree {
    let mut nodes = Vec::new();

    if ctx.platform_menus {
        nodes.push(MenuNode::Predefined(Predefined::App));
        nodes.push(MenuNode::Predefined(Predefined::Edit));
    }

    for (ci, category) in categories.iter().enumerate() {
        let mut children = Vec::with_capacity(category.entries.len());
        for (ei, entry) in category.entries.iter().enumerate() {
            children.push(item(
                format!("g{}/builtin:{ci}:{ei}", ctx.generation),
                &entry.label,
                None,
                MenuAction::Open(Selection::BuiltIn(entry.clone())),
            ));
            if entry.separator {
                children.push(MenuNode::Separator);
            }
        }
        nodes.push(submenu(&category.title, children));
    }

    nodes.push(custom_menu(custom, ctx.generation));
    nodes.push(settings_menu());
    nodes.push(help_menu());

    MenuTree { nodes }
}

/// Partitions custom entries by group, in order of first appearance.
/// Each value keeps the entries' source index and source order.
pub fn group_entries(custom: &[CustomEntry]) -> IndexMap<&str, Vec<(usize, &CustomEntry)>> {
    let mut groups: IndexMap<&str, Vec<(usize, &CustomEntry)>> = IndexMap::new();
    for (index, entry) in custom.iter().enumerate() {
        groups.entry(entry.group_name()).or_default().push((index, entry));
    }
    groups
}

fn custom_menu(custom: &[CustomEntry], generation: u64) -> MenuNode {
    let mut groups = group_entries(custom);
    let mut children = Vec::new();

    // Default group leads and is the only one without a separator in front.
    if let Some(entries) = groups.shift_remove(DEFAULT_GROUP) {
        children.push(group_menu(DEFAULT_GROUP, &entries, generation));
    }
    for (name, entries) in &groups {
        children.push(MenuNode::Separator);
        children.push(group_menu(name, entries, generation));
    }

    submenu(CUSTOM_MENU_TITLE, children)
}

fn group_menu(name: &str, entries: &[(usize, &CustomEntry)], generation: u64) -> MenuNode {
    let mut children = Vec::with_capacity(entries.len());
    for (index, entry) in entries {
        children.push(item(
            format!("g{generation}/custom:{index}"),
            &entry.label,
            None,
            MenuAction::Open(Selection::Custom((*entry).clone())),
        ));
        if entry.separator {
            children.push(MenuNode::Separator);
        }
    }
    submenu(name, children)
}

fn settings_menu() -> MenuNode {
    submenu(
        SETTINGS_MENU_TITLE,
        vec![
            item("settings.open", "Open Settings", Some("CmdOrCtrl+O"), MenuAction::OpenSettings),
            item("settings.sidebar", "Sidebar Mode", Some("CmdOrCtrl+S"), MenuAction::SidebarMode),
            item("settings.window", "Window Mode", Some("CmdOrCtrl+W"), MenuAction::WindowMode),
            MenuNode::Separator,
            item("settings.import", "Import Custom Platforms...", None, MenuAction::ImportCustom),
            item("settings.export", "Export Custom Platforms...", None, MenuAction::ExportCustom),
        ],
    )
}

fn help_menu() -> MenuNode {
    submenu(
        HELP_MENU_TITLE,
        vec![
            item("help.about", "About", None, MenuAction::About),
            item("help.github", "Go to GitHub", None, MenuAction::OpenRepository),
            item("help.update", "Check for Updates", None, MenuAction::CheckForUpdates),
        ],
    )
}
