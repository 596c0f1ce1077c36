//! Typed view of the preferences the engine reads.

use panelmenu_types::PinnedApp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::SettingsStore;
use super::keys;
use crate::category::CategoryKind;
use crate::layout::{DefaultViewKind, LayoutKind, LayoutProfile};
use crate::pinned;

/// Panel box the menu button sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// Panel button look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonStyle {
    pub appearance: String,
    pub text: String,
    pub icon: String,
    pub icon_size: i64,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            appearance: "icon".to_string(),
            text: "Apps".to_string(),
            icon: "start-here-symbolic".to_string(),
            icon_size: 20,
        }
    }
}

/// A global shortcut binding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hotkey {
    #[default]
    Disabled,
    SuperL,
    SuperR,
    Custom(String),
}

impl Hotkey {
    fn parse(kind: &str, custom: &str) -> Self {
        match kind {
            "super-l" | "Super_L" => Self::SuperL,
            "super-r" | "Super_R" => Self::SuperR,
            "custom" if !custom.is_empty() => Self::Custom(custom.to_string()),
            "none" | "" | "custom" => Self::Disabled,
            other => {
                warn!("Unknown hotkey kind '{other}', treating as disabled");
                Self::Disabled
            }
        }
    }

    /// Accelerator string the host should grab, if any
    #[must_use]
    pub fn accelerator(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::SuperL => Some("Super_L"),
            Self::SuperR => Some("Super_R"),
            Self::Custom(accel) => Some(accel),
        }
    }
}

/// Shortcuts for the panel menu and the standalone runner
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HotkeyBindings {
    pub menu: Hotkey,
    pub runner: Hotkey,
}

/// Snapshot of every preference the engine consumes
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSettings {
    pub layout: LayoutProfile,
    pub default_view: DefaultViewKind,
    pub activate_on_hover: bool,
    pub multi_monitor: bool,
    pub open_on_primary: bool,
    pub runner_enabled: bool,
    pub button_position: ButtonPosition,
    pub button_offset: i64,
    pub button_style: ButtonStyle,
    pub menu_width: f64,
    pub menu_height: f64,
    pub runner_width: f64,
    pub runner_height: f64,
    pub extra_categories: Vec<(CategoryKind, bool)>,
    pub pinned: Vec<PinnedApp>,
    pub pinned_columns: usize,
    pub hotkeys: HotkeyBindings,
}

impl Default for MenuSettings {
    fn default() -> Self {
        let layout = LayoutProfile::default();
        Self {
            default_view: layout.default_view,
            activate_on_hover: true,
            multi_monitor: false,
            open_on_primary: false,
            runner_enabled: false,
            button_position: ButtonPosition::Left,
            button_offset: 0,
            button_style: ButtonStyle::default(),
            menu_width: layout.width,
            menu_height: layout.height,
            runner_width: 500.0,
            runner_height: 400.0,
            extra_categories: default_extra_categories(),
            pinned: Vec::new(),
            pinned_columns: layout.pinned_columns,
            hotkeys: HotkeyBindings {
                menu: Hotkey::SuperL,
                runner: Hotkey::Disabled,
            },
            layout,
        }
    }
}

fn default_extra_categories() -> Vec<(CategoryKind, bool)> {
    vec![
        (CategoryKind::Pinned, true),
        (CategoryKind::Frequent, false),
        (CategoryKind::AllApps, true),
        (CategoryKind::Recent, false),
    ]
}

impl MenuSettings {
    /// Read every consumed key, falling back to defaults for missing or
    /// mistyped values.
    #[must_use]
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        let reader = Reader(store);

        let layout = reader
            .string(keys::MENU_LAYOUT)
            .and_then(|name| {
                let parsed = LayoutKind::from_name(&name);
                if parsed.is_none() {
                    warn!("Unknown menu layout '{name}', using default");
                }
                parsed
            })
            .unwrap_or_default()
            .profile();

        let default_view = reader
            .string(keys::DEFAULT_MENU_VIEW)
            .and_then(|name| DefaultViewKind::from_name(&name))
            .unwrap_or(layout.default_view);

        let button_position = match reader.string(keys::POSITION_IN_PANEL).as_deref() {
            Some("center") => ButtonPosition::Center,
            Some("right") => ButtonPosition::Right,
            _ => ButtonPosition::Left,
        };

        let button_style = ButtonStyle {
            appearance: reader
                .string(keys::MENU_BUTTON_APPEARANCE)
                .unwrap_or(defaults.button_style.appearance),
            text: reader
                .string(keys::MENU_BUTTON_TEXT)
                .unwrap_or(defaults.button_style.text),
            icon: reader
                .string(keys::MENU_BUTTON_ICON)
                .unwrap_or(defaults.button_style.icon),
            icon_size: reader
                .int(keys::MENU_BUTTON_ICON_SIZE)
                .unwrap_or(defaults.button_style.icon_size),
        };

        let extra_categories = reader
            .list(keys::EXTRA_CATEGORIES)
            .map_or(defaults.extra_categories, |list| parse_extra_categories(&list));

        let pinned = reader
            .list(keys::PINNED_APPS)
            .map(|flat| pinned::parse(&flat))
            .unwrap_or_default();

        let pinned_columns = reader
            .int(keys::PINNED_GRID_COLUMNS)
            .and_then(|c| usize::try_from(c).ok())
            .filter(|c| *c > 0)
            .unwrap_or(layout.pinned_columns);

        let hotkeys = HotkeyBindings {
            menu: reader.string(keys::MENU_HOTKEY).map_or(defaults.hotkeys.menu, |kind| {
                Hotkey::parse(&kind, &reader.string(keys::MENU_KEYBINDING_TEXT).unwrap_or_default())
            }),
            runner: reader.string(keys::RUNNER_HOTKEY).map_or(defaults.hotkeys.runner, |kind| {
                Hotkey::parse(&kind, &reader.string(keys::RUNNER_KEYBINDING_TEXT).unwrap_or_default())
            }),
        };

        let width_adjustment = reader.float(keys::MENU_WIDTH_ADJUSTMENT).unwrap_or(0.0);
        let menu_width = reader
            .float(keys::LEFT_PANEL_WIDTH)
            .unwrap_or(layout.width)
            + width_adjustment;

        Self {
            default_view,
            activate_on_hover: reader.bool(keys::ACTIVATE_ON_HOVER).unwrap_or(true),
            multi_monitor: reader.bool(keys::MULTI_MONITOR).unwrap_or(false),
            open_on_primary: reader.bool(keys::HOTKEY_OPEN_PRIMARY_MONITOR).unwrap_or(false),
            runner_enabled: reader.bool(keys::ENABLE_STANDALONE_RUNNER).unwrap_or(false),
            button_position,
            button_offset: reader.int(keys::MENU_BUTTON_POSITION_OFFSET).unwrap_or(0),
            button_style,
            menu_width,
            menu_height: reader.float(keys::MENU_HEIGHT).unwrap_or(layout.height),
            runner_width: reader.float(keys::RUNNER_MENU_WIDTH).unwrap_or(defaults.runner_width),
            runner_height: reader
                .float(keys::RUNNER_MENU_HEIGHT)
                .unwrap_or(defaults.runner_height),
            extra_categories,
            pinned,
            pinned_columns,
            hotkeys,
            layout,
        }
    }

    /// Whether hover should switch categories at all
    #[must_use]
    pub fn hover_enabled(&self) -> bool {
        self.activate_on_hover && self.layout.hover_activation
    }
}

/// Entries are category names; a leading `!` marks the entry disabled.
fn parse_extra_categories(list: &[String]) -> Vec<(CategoryKind, bool)> {
    list.iter()
        .filter_map(|entry| {
            let (name, enabled) = match entry.strip_prefix('!') {
                Some(rest) => (rest, false),
                None => (entry.as_str(), true),
            };
            let kind = CategoryKind::from_extra(name);
            if kind.is_none() {
                warn!("Ignoring unknown extra category '{name}'");
            }
            kind.map(|k| (k, enabled))
        })
        .collect()
}

struct Reader<'a>(&'a dyn SettingsStore);

impl Reader<'_> {
    fn bool(&self, key: &str) -> Option<bool> {
        self.typed(key, |v| v.as_bool())
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.typed(key, |v| v.as_int())
    }

    fn float(&self, key: &str) -> Option<f64> {
        self.typed(key, |v| v.as_f64())
    }

    fn string(&self, key: &str) -> Option<String> {
        self.typed(key, |v| v.as_str().map(str::to_string))
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.typed(key, |v| v.as_str_list().map(<[String]>::to_vec))
    }

    fn typed<T>(
        &self,
        key: &str,
        extract: impl FnOnce(&panelmenu_types::SettingValue) -> Option<T>,
    ) -> Option<T> {
        let value = self.0.get(key)?;
        let typed = extract(&value);
        if typed.is_none() {
            warn!("Preference '{key}' has unexpected type: {value:?}");
        }
        typed
    }
}
