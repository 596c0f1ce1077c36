//! Headless host collaborators.
//!
//! Without a compositor connection the daemon takes monitor geometry from
//! `config.json` and learns where the pointer is from the `toggle` request.
//! Applications come from freedesktop `.desktop` files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use panelmenu_core::config::MonitorsConfig;
use panelmenu_core::{ApplicationInventory, WindowManager};
use panelmenu_types::{AppDescriptor, MonitorIndex, Rect};
use tracing::{debug, info, warn};

/// Window manager with a fixed monitor layout
#[derive(Debug, Clone, Default)]
pub struct StaticWindowManager {
    monitors: Vec<Rect>,
    primary: MonitorIndex,
    pointer: Option<MonitorIndex>,
    focused: Option<MonitorIndex>,
}

impl StaticWindowManager {
    #[must_use]
    pub fn new(monitors: Vec<Rect>, primary: MonitorIndex) -> Self {
        Self {
            monitors,
            primary,
            pointer: None,
            focused: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &MonitorsConfig) -> Self {
        Self::new(config.outputs.clone(), config.primary)
    }

    /// Record the monitor the caller reported the pointer on.
    pub fn set_pointer_monitor(&mut self, monitor: Option<MonitorIndex>) {
        self.pointer = monitor;
    }

    pub fn set_monitors(&mut self, monitors: Vec<Rect>, primary: MonitorIndex) {
        self.monitors = monitors;
        self.primary = primary;
    }

    /// Last monitor focus was moved to
    #[must_use]
    pub fn focused(&self) -> Option<MonitorIndex> {
        self.focused
    }
}

impl WindowManager for StaticWindowManager {
    fn monitors(&self) -> Vec<Rect> {
        self.monitors.clone()
    }

    fn current_monitor_for_pointer(&self) -> Option<MonitorIndex> {
        self.pointer
    }

    fn primary_monitor(&self) -> MonitorIndex {
        self.primary
    }

    fn focus_monitor(&mut self, monitor: MonitorIndex) {
        debug!("Focusing monitor {monitor}");
        self.focused = Some(monitor);
    }
}

/// Applications discovered from `.desktop` files
#[derive(Debug, Clone, Default)]
pub struct DesktopEntryInventory {
    apps: Vec<AppDescriptor>,
}

impl DesktopEntryInventory {
    /// Scan `applications/` directories in priority order. An id found in an
    /// earlier directory is never replaced by a later one.
    #[must_use]
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut seen = HashSet::new();
        let mut apps = Vec::new();

        for dir in dirs {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Skipping application directory {:?}: {}", dir, e);
                    continue;
                }
            };

            let mut paths: Vec<PathBuf> = entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "desktop"))
                .collect();
            paths.sort();

            for path in paths {
                let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                    continue;
                };
                // Hidden or NoDisplay entries still shadow later directories.
                if !seen.insert(id.clone()) {
                    continue;
                }
                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        if let Some(app) = parse_desktop_entry(&id, &content) {
                            apps.push(app);
                        }
                    }
                    Err(e) => warn!("Failed to read {:?}: {}", path, e),
                }
            }
        }

        info!("Found {} application(s) in {} director(ies)", apps.len(), dirs.len());
        Self { apps }
    }

    /// Scan the XDG data directories
    #[must_use]
    pub fn from_xdg() -> Self {
        Self::scan(&xdg_application_dirs())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl ApplicationInventory for DesktopEntryInventory {
    fn applications(&self) -> Vec<AppDescriptor> {
        self.apps.clone()
    }

    // No launch history is kept, so there is no usage ranking.
    fn most_used(&self) -> Vec<String> {
        Vec::new()
    }
}

/// `applications/` under the user data dir, then under `$XDG_DATA_DIRS`
#[must_use]
pub fn xdg_application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(base) = directories::BaseDirs::new() {
        dirs.push(base.data_dir().join("applications"));
    }
    let system = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs.extend(
        system
            .split(':')
            .filter(|s| !s.is_empty())
            .map(|s| Path::new(s).join("applications")),
    );
    dirs
}

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for hidden entries, non-applications and entries without
/// a name.
#[must_use]
pub fn parse_desktop_entry(id: &str, content: &str) -> Option<AppDescriptor> {
    let mut in_entry = false;
    let mut name = None;
    let mut icon = String::new();
    let mut categories = Vec::new();
    let mut keywords = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Type" if value != "Application" => return None,
            "NoDisplay" | "Hidden" if value == "true" => return None,
            "Name" => name = Some(value.to_string()),
            "Icon" => icon = value.to_string(),
            "Categories" => categories = split_list(value),
            "Keywords" => keywords = split_list(value),
            _ => {}
        }
    }

    Some(AppDescriptor {
        id: id.to_string(),
        name: name?,
        icon,
        categories,
        keywords,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FIREFOX: &str = "\
[Desktop Entry]
Type=Application
Name=Firefox
Name[de]=Firefox Webbrowser
Icon=firefox
Categories=Network;WebBrowser;
Keywords=web;browser;

[Desktop Action new-window]
Name=New Window
";

    #[test]
    fn test_parse_desktop_entry() {
        let app = parse_desktop_entry("firefox.desktop", FIREFOX).unwrap();
        assert_eq!(app.name, "Firefox");
        assert_eq!(app.icon, "firefox");
        assert_eq!(app.categories, vec!["Network", "WebBrowser"]);
        assert_eq!(app.keywords, vec!["web", "browser"]);
    }

    #[test]
    fn test_parse_skips_hidden_and_non_applications() {
        assert!(parse_desktop_entry("a.desktop", "[Desktop Entry]\nName=A\nNoDisplay=true\n").is_none());
        assert!(parse_desktop_entry("b.desktop", "[Desktop Entry]\nName=B\nHidden=true\n").is_none());
        assert!(parse_desktop_entry("c.desktop", "[Desktop Entry]\nType=Link\nName=C\n").is_none());
        assert!(parse_desktop_entry("d.desktop", "[Desktop Entry]\nIcon=d\n").is_none());
    }

    #[test]
    fn test_scan_earlier_directory_wins() {
        let user = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();
        std::fs::write(user.path().join("calc.desktop"), "[Desktop Entry]\nName=My Calc\n").unwrap();
        std::fs::write(system.path().join("calc.desktop"), "[Desktop Entry]\nName=Calc\n").unwrap();
        std::fs::write(system.path().join("gimp.desktop"), "[Desktop Entry]\nName=GIMP\n").unwrap();
        std::fs::write(system.path().join("notes.txt"), "ignored").unwrap();

        let inventory =
            DesktopEntryInventory::scan(&[user.path().to_path_buf(), system.path().to_path_buf()]);
        let apps = inventory.applications();

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "My Calc");
        assert_eq!(apps[1].id, "gimp.desktop");
    }

    #[test]
    fn test_scan_hidden_entry_shadows_later_directory() {
        let user = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();
        std::fs::write(
            user.path().join("calc.desktop"),
            "[Desktop Entry]\nName=Calc\nHidden=true\n",
        )
        .unwrap();
        std::fs::write(system.path().join("calc.desktop"), "[Desktop Entry]\nName=Calc\n").unwrap();

        let inventory =
            DesktopEntryInventory::scan(&[user.path().to_path_buf(), system.path().to_path_buf()]);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_skipped() {
        let inventory = DesktopEntryInventory::scan(&[PathBuf::from("/nonexistent/applications")]);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_window_manager_tracks_pointer_and_focus() {
        let mut wm = StaticWindowManager::from_config(&MonitorsConfig::default());
        assert_eq!(wm.monitors().len(), 1);
        assert_eq!(wm.current_monitor_for_pointer(), None);

        wm.set_pointer_monitor(Some(0));
        wm.focus_monitor(0);
        assert_eq!(wm.current_monitor_for_pointer(), Some(0));
        assert_eq!(wm.focused(), Some(0));
    }
}
