//! Menu layouts as data.
//!
//! Every visual style shares the same navigation, drag and coordination
//! engine. What differs is captured by a [`LayoutProfile`] value, plus the one
//! behaviour that genuinely varies per layout: which view a freshly opened
//! menu lands on ([`DefaultViewPolicy`]).

use serde::{Deserialize, Serialize};

use crate::category::{CategoryItem, CategoryKind};

/// Known menu layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Arc,
    Brisk,
    Eleven,
    Redmond,
    Runner,
    Plasma,
}

impl LayoutKind {
    /// Parse a `menu-layout` preference value
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "arc" | "default" => Some(Self::Arc),
            "brisk" => Some(Self::Brisk),
            "eleven" => Some(Self::Eleven),
            "redmond" => Some(Self::Redmond),
            "runner" => Some(Self::Runner),
            "plasma" => Some(Self::Plasma),
            _ => None,
        }
    }

    #[must_use]
    pub fn profile(self) -> LayoutProfile {
        match self {
            Self::Arc => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Right,
                hover_activation: true,
                pinned_columns: 1,
                show_pinned_grid: true,
                default_view: DefaultViewKind::PinnedFirst,
                width: 290.0,
                height: 550.0,
            },
            Self::Brisk => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Right,
                hover_activation: true,
                pinned_columns: 1,
                show_pinned_grid: true,
                default_view: DefaultViewKind::FirstCategory,
                width: 500.0,
                height: 550.0,
            },
            Self::Eleven => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Right,
                hover_activation: false,
                pinned_columns: 6,
                show_pinned_grid: true,
                default_view: DefaultViewKind::PinnedFirst,
                width: 650.0,
                height: 600.0,
            },
            Self::Redmond => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Left,
                hover_activation: true,
                pinned_columns: 4,
                show_pinned_grid: true,
                default_view: DefaultViewKind::Frequent,
                width: 520.0,
                height: 550.0,
            },
            Self::Runner => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Right,
                hover_activation: false,
                pinned_columns: 1,
                show_pinned_grid: false,
                default_view: DefaultViewKind::Search,
                width: 500.0,
                height: 400.0,
            },
            Self::Plasma => LayoutProfile {
                kind: self,
                submenu_side: SubmenuSide::Right,
                hover_activation: true,
                pinned_columns: 4,
                show_pinned_grid: true,
                default_view: DefaultViewKind::PinnedFirst,
                width: 450.0,
                height: 550.0,
            },
        }
    }
}

/// Which side of the category column the category contents open on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmenuSide {
    #[default]
    Right,
    /// Mirrored layouts
    Left,
}

/// Capability flags and geometry constants shared by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProfile {
    pub kind: LayoutKind,
    pub submenu_side: SubmenuSide,
    pub hover_activation: bool,
    pub pinned_columns: usize,
    pub show_pinned_grid: bool,
    pub default_view: DefaultViewKind,
    pub width: f64,
    pub height: f64,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        LayoutKind::default().profile()
    }
}

/// View shown by a surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Pinned,
    Category(CategoryKind),
    Search,
}

impl ActiveView {
    /// Whether the predictor may switch categories while this view is up
    #[must_use]
    pub fn is_hover_navigable(&self) -> bool {
        !matches!(self, Self::Search)
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Pinned => "pinned".to_string(),
            Self::Category(kind) => format!("category:{}", kind.label()),
            Self::Search => "search".to_string(),
        }
    }
}

/// Chooses the view a menu shows when opened or reloaded
pub trait DefaultViewPolicy {
    fn default_view(&self, categories: &[CategoryItem]) -> ActiveView;
}

struct PinnedFirst;
struct FirstCategory;
struct FrequentFirst;
struct SearchFirst;

impl DefaultViewPolicy for PinnedFirst {
    fn default_view(&self, _categories: &[CategoryItem]) -> ActiveView {
        ActiveView::Pinned
    }
}

impl DefaultViewPolicy for FirstCategory {
    fn default_view(&self, categories: &[CategoryItem]) -> ActiveView {
        categories
            .first()
            .map_or(ActiveView::Pinned, |c| ActiveView::Category(c.kind.clone()))
    }
}

impl DefaultViewPolicy for FrequentFirst {
    fn default_view(&self, categories: &[CategoryItem]) -> ActiveView {
        if categories.iter().any(|c| c.kind == CategoryKind::Frequent) {
            ActiveView::Category(CategoryKind::Frequent)
        } else {
            FirstCategory.default_view(categories)
        }
    }
}

impl DefaultViewPolicy for SearchFirst {
    fn default_view(&self, _categories: &[CategoryItem]) -> ActiveView {
        ActiveView::Search
    }
}

/// Selector for the built-in [`DefaultViewPolicy`] implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultViewKind {
    PinnedFirst,
    FirstCategory,
    Frequent,
    Search,
}

impl DefaultViewKind {
    /// Parse a `default-menu-view` preference; `"layout"` defers to the layout
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pinned" | "pinned-apps" => Some(Self::PinnedFirst),
            "categories" | "first-category" => Some(Self::FirstCategory),
            "frequent" | "frequent-apps" => Some(Self::Frequent),
            "search" => Some(Self::Search),
            _ => None,
        }
    }

    #[must_use]
    pub fn policy(self) -> &'static dyn DefaultViewPolicy {
        match self {
            Self::PinnedFirst => &PinnedFirst,
            Self::FirstCategory => &FirstCategory,
            Self::Frequent => &FrequentFirst,
            Self::Search => &SearchFirst,
        }
    }
}
