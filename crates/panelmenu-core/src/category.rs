//! Hover-navigable category items and the category list builder.

use std::collections::BTreeMap;

use panelmenu_types::{AppDescriptor, PinnedApp, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::ApplicationInventory;

/// Identity of a category row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    Pinned,
    Frequent,
    AllApps,
    Recent,
    /// A freedesktop main category present in the inventory
    Directory(String),
}

impl CategoryKind {
    /// Parse an entry of the `extra-categories` preference
    #[must_use]
    pub fn from_extra(name: &str) -> Option<Self> {
        match name {
            "pinned" | "favorites" => Some(Self::Pinned),
            "frequent" | "frequent-apps" => Some(Self::Frequent),
            "all-apps" | "all-programs" => Some(Self::AllApps),
            "recent" | "recent-files" => Some(Self::Recent),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pinned => "pinned",
            Self::Frequent => "frequent",
            Self::AllApps => "all-apps",
            Self::Recent => "recent",
            Self::Directory(name) => name,
        }
    }
}

/// One selectable row in a category list.
///
/// The rectangle is only meaningful while the row is mounted; readers get
/// `None` otherwise and must treat the geometry as unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryItem {
    pub kind: CategoryKind,
    /// App ids (or pinned commands) shown when the category is active
    pub apps: Vec<String>,
    pub hover_activation: bool,
    rect: Option<Rect>,
}

impl CategoryItem {
    #[must_use]
    pub fn new(kind: CategoryKind, apps: Vec<String>) -> Self {
        Self {
            kind,
            apps,
            hover_activation: true,
            rect: None,
        }
    }

    #[must_use]
    pub fn with_hover_activation(mut self, enabled: bool) -> Self {
        self.hover_activation = enabled;
        self
    }

    pub fn mount(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }

    pub fn unmount(&mut self) {
        self.rect = None;
    }

    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.rect.is_some()
    }
}

/// Build the category list wholesale.
///
/// `extras` come first in preference order (disabled ones skipped), followed
/// by one directory per inventory category, sorted by name. Directories with
/// no apps are not listed.
#[must_use]
pub fn build_categories(
    extras: &[(CategoryKind, bool)],
    pinned: &[PinnedApp],
    inventory: &dyn ApplicationInventory,
    hover_activation: bool,
) -> Vec<CategoryItem> {
    let apps = inventory.applications();
    let mut items = Vec::new();

    for (kind, enabled) in extras {
        if !enabled {
            continue;
        }
        let contents = match kind {
            CategoryKind::Pinned => pinned.iter().map(|p| p.command.clone()).collect(),
            CategoryKind::Frequent => inventory.most_used(),
            CategoryKind::AllApps => all_apps_by_name(&apps),
            CategoryKind::Recent => Vec::new(),
            CategoryKind::Directory(name) => directory_apps(&apps, name),
        };
        items.push(CategoryItem::new(kind.clone(), contents).with_hover_activation(hover_activation));
    }

    let mut directories: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for app in &apps {
        for category in &app.categories {
            directories
                .entry(category.as_str())
                .or_default()
                .push(app.id.clone());
        }
    }

    for (name, ids) in directories {
        let kind = CategoryKind::Directory(name.to_string());
        if ids.is_empty() || items.iter().any(|c| c.kind == kind) {
            continue;
        }
        items.push(CategoryItem::new(kind, ids).with_hover_activation(hover_activation));
    }

    debug!("Built {} categories from {} apps", items.len(), apps.len());
    items
}

fn all_apps_by_name(apps: &[AppDescriptor]) -> Vec<String> {
    let mut sorted: Vec<&AppDescriptor> = apps.iter().collect();
    sorted.sort_by_key(|a| a.name.to_lowercase());
    sorted.into_iter().map(|a| a.id.clone()).collect()
}

fn directory_apps(apps: &[AppDescriptor], name: &str) -> Vec<String> {
    apps.iter()
        .filter(|a| a.categories.iter().any(|c| c == name))
        .map(|a| a.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticInventory;

    fn app(id: &str, name: &str, categories: &[&str]) -> AppDescriptor {
        AppDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            ..Default::default()
        }
    }

    fn inventory() -> StaticInventory {
        let mut inv = StaticInventory::new(vec![
            app("gimp.desktop", "GIMP", &["Graphics"]),
            app("writer.desktop", "Writer", &["Office"]),
            app("calc.desktop", "Calc", &["Office"]),
        ]);
        inv.most_used = vec!["calc.desktop".to_string()];
        inv
    }

    #[test]
    fn test_extras_precede_sorted_directories() {
        let extras = vec![(CategoryKind::Frequent, true), (CategoryKind::AllApps, true)];
        let items = build_categories(&extras, &[], &inventory(), true);

        let kinds: Vec<&str> = items.iter().map(|c| c.kind.label()).collect();
        assert_eq!(kinds, vec!["frequent", "all-apps", "Graphics", "Office"]);
        assert_eq!(items[0].apps, vec!["calc.desktop"]);
        assert_eq!(
            items[1].apps,
            vec!["calc.desktop", "gimp.desktop", "writer.desktop"]
        );
    }

    #[test]
    fn test_disabled_extras_are_skipped() {
        let extras = vec![(CategoryKind::Recent, false), (CategoryKind::Pinned, true)];
        let pinned = vec![PinnedApp::new("Files", "", "files.desktop")];
        let items = build_categories(&extras, &pinned, &inventory(), true);

        assert_eq!(items[0].kind, CategoryKind::Pinned);
        assert_eq!(items[0].apps, vec!["files.desktop"]);
        assert!(!items.iter().any(|c| c.kind == CategoryKind::Recent));
    }

    #[test]
    fn test_items_start_unmounted() {
        let items = build_categories(&[], &[], &inventory(), false);
        assert!(items.iter().all(|c| !c.is_mounted()));
        assert!(items.iter().all(|c| !c.hover_activation));
    }

    #[test]
    fn test_mount_and_unmount() {
        let mut item = CategoryItem::new(CategoryKind::AllApps, Vec::new());
        item.mount(Rect::new(0.0, 0.0, 200.0, 32.0));
        assert_eq!(item.rect(), Some(Rect::new(0.0, 0.0, 200.0, 32.0)));
        item.unmount();
        assert_eq!(item.rect(), None);
    }

    #[test]
    fn test_extra_names() {
        assert_eq!(CategoryKind::from_extra("favorites"), Some(CategoryKind::Pinned));
        assert_eq!(CategoryKind::from_extra("nope"), None);
    }
}
