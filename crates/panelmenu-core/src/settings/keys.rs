//! Preference keys and the flat key → update routing table.
//!
//! Every key the menu reacts to appears exactly once in [`ROUTES`]. Adding a
//! preference means adding one line here.

use serde::{Deserialize, Serialize};

pub const POSITION_IN_PANEL: &str = "position-in-panel";
pub const MENU_BUTTON_POSITION_OFFSET: &str = "menu-button-position-offset";
pub const MULTI_MONITOR: &str = "multi-monitor";
pub const HOTKEY_OPEN_PRIMARY_MONITOR: &str = "hotkey-open-primary-monitor";
pub const ENABLE_STANDALONE_RUNNER: &str = "enable-standalone-runner-menu";

pub const MENU_BUTTON_APPEARANCE: &str = "menu-button-appearance";
pub const MENU_BUTTON_TEXT: &str = "menu-button-text";
pub const MENU_BUTTON_ICON: &str = "menu-button-icon";
pub const MENU_BUTTON_ICON_SIZE: &str = "custom-menu-button-icon-size";

pub const MENU_HEIGHT: &str = "menu-height";
pub const MENU_WIDTH_ADJUSTMENT: &str = "menu-width-adjustment";
pub const LEFT_PANEL_WIDTH: &str = "left-panel-width";
pub const RUNNER_MENU_HEIGHT: &str = "runner-menu-height";
pub const RUNNER_MENU_WIDTH: &str = "runner-menu-width";

pub const MENU_LAYOUT: &str = "menu-layout";
pub const ACTIVATE_ON_HOVER: &str = "activate-on-hover";
pub const DEFAULT_MENU_VIEW: &str = "default-menu-view";

pub const EXTRA_CATEGORIES: &str = "extra-categories";

pub const PINNED_APPS: &str = "pinned-apps";
pub const PINNED_GRID_COLUMNS: &str = "pinned-grid-columns";

pub const MENU_HOTKEY: &str = "menu-hotkey";
pub const MENU_KEYBINDING_TEXT: &str = "menu-keybinding-text";
pub const RUNNER_HOTKEY: &str = "runner-hotkey";
pub const RUNNER_KEYBINDING_TEXT: &str = "runner-keybinding-text";

/// The fixed set of surface updates a preference change can trigger.
///
/// Every handler is idempotent: it recomputes its piece of state from the
/// current preferences, so running it twice is the same as running it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateOp {
    RepositionButton,
    RestyleButton,
    ResizeMenu,
    ReloadContent,
    RebuildCategoryList,
    RebuildPinnedList,
    RebuildHotkeys,
}

impl UpdateOp {
    pub const ALL: [Self; 7] = [
        Self::RepositionButton,
        Self::RestyleButton,
        Self::ResizeMenu,
        Self::ReloadContent,
        Self::RebuildCategoryList,
        Self::RebuildPinnedList,
        Self::RebuildHotkeys,
    ];
}

/// One `(key, handler)` binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub key: &'static str,
    pub op: UpdateOp,
}

const fn route(key: &'static str, op: UpdateOp) -> Route {
    Route { key, op }
}

use UpdateOp::{
    RebuildCategoryList, RebuildHotkeys, RebuildPinnedList, ReloadContent, RepositionButton,
    ResizeMenu, RestyleButton,
};

pub static ROUTES: &[Route] = &[
    // Where buttons and surfaces live
    route(POSITION_IN_PANEL, RepositionButton),
    route(MENU_BUTTON_POSITION_OFFSET, RepositionButton),
    route("menu-position-alignment", RepositionButton),
    route(MULTI_MONITOR, RepositionButton),
    route(HOTKEY_OPEN_PRIMARY_MONITOR, RepositionButton),
    route(ENABLE_STANDALONE_RUNNER, RepositionButton),
    route("runner-position", RepositionButton),
    route("dash-to-panel-standalone", RepositionButton),
    // Panel button look
    route(MENU_BUTTON_APPEARANCE, RestyleButton),
    route(MENU_BUTTON_TEXT, RestyleButton),
    route(MENU_BUTTON_ICON, RestyleButton),
    route(MENU_BUTTON_ICON_SIZE, RestyleButton),
    route("custom-menu-button-icon", RestyleButton),
    route("distro-icon", RestyleButton),
    route("menu-button-padding", RestyleButton),
    route("menu-button-fg-color", RestyleButton),
    route("menu-button-hover-fg-color", RestyleButton),
    route("menu-button-hover-bg-color", RestyleButton),
    route("menu-button-active-fg-color", RestyleButton),
    route("menu-button-active-bg-color", RestyleButton),
    route("menu-button-border-radius", RestyleButton),
    route("menu-button-border-width", RestyleButton),
    route("menu-button-border-color", RestyleButton),
    // Popup geometry
    route(MENU_HEIGHT, ResizeMenu),
    route(MENU_WIDTH_ADJUSTMENT, ResizeMenu),
    route(LEFT_PANEL_WIDTH, ResizeMenu),
    route("right-panel-width", ResizeMenu),
    route("menu-arrow-rise", ResizeMenu),
    route("menu-font-size", ResizeMenu),
    route("menu-item-icon-size", ResizeMenu),
    route("button-item-icon-size", ResizeMenu),
    route("quicklinks-item-icon-size", ResizeMenu),
    route(RUNNER_MENU_HEIGHT, ResizeMenu),
    route(RUNNER_MENU_WIDTH, ResizeMenu),
    // Everything inside the popup
    route(MENU_LAYOUT, ReloadContent),
    route(ACTIVATE_ON_HOVER, ReloadContent),
    route(DEFAULT_MENU_VIEW, ReloadContent),
    route("override-menu-theme", ReloadContent),
    route("menu-background-color", ReloadContent),
    route("menu-foreground-color", ReloadContent),
    route("menu-border-color", ReloadContent),
    route("menu-separator-color", ReloadContent),
    route("menu-item-hover-bg-color", ReloadContent),
    route("menu-item-active-bg-color", ReloadContent),
    route("search-entry-border-radius", ReloadContent),
    route("searchbar-default-bottom-location", ReloadContent),
    route("searchbar-default-top-location", ReloadContent),
    route("search-provider-open-windows", ReloadContent),
    route("search-provider-recent-files", ReloadContent),
    route("disable-recently-installed-apps", ReloadContent),
    route("disable-tooltips", ReloadContent),
    route("show-hidden-recent-files", ReloadContent),
    route("power-options", ReloadContent),
    route("show-external-devices", ReloadContent),
    route("show-bookmarks", ReloadContent),
    route("directory-shortcuts", ReloadContent),
    route("application-shortcuts", ReloadContent),
    route("avatar-style", ReloadContent),
    route("disable-user-avatar", ReloadContent),
    route("enable-clock-widget", ReloadContent),
    route("enable-weather-widget", ReloadContent),
    // Category column
    route(EXTRA_CATEGORIES, RebuildCategoryList),
    route("category-icon-type", RebuildCategoryList),
    route("enable-sub-menus", RebuildCategoryList),
    route("alphabetize-all-programs", RebuildCategoryList),
    // Pinned grid
    route(PINNED_APPS, RebuildPinnedList),
    route(PINNED_GRID_COLUMNS, RebuildPinnedList),
    route("pinned-grid-icon-size", RebuildPinnedList),
    // Global shortcuts
    route(MENU_HOTKEY, RebuildHotkeys),
    route(MENU_KEYBINDING_TEXT, RebuildHotkeys),
    route("menu-hotkey-activation", RebuildHotkeys),
    route(RUNNER_HOTKEY, RebuildHotkeys),
    route(RUNNER_KEYBINDING_TEXT, RebuildHotkeys),
    route("runner-hotkey-activation", RebuildHotkeys),
];

/// The update a key routes to, if any
#[must_use]
pub fn route_for(key: &str) -> Option<UpdateOp> {
    ROUTES.iter().find(|r| r.key == key).map(|r| r.op)
}

#[must_use]
pub fn is_known(key: &str) -> bool {
    route_for(key).is_some()
}
