//! Preference store persisted to `preferences.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use panelmenu_core::config::warn_unknown_preferences;
use panelmenu_core::settings::{ChangeCallback, SubscriptionId};
use panelmenu_core::{MemoryStore, SettingsStore};
use panelmenu_types::SettingValue;
use tracing::{debug, info};

use crate::error::Result;

/// [`SettingsStore`] backed by a flat JSON object on disk.
///
/// Writes go through to the file immediately. [`FileStore::reload`] picks
/// up edits made by other processes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Load the store, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_values(&path)?;
        info!("Loaded {} preference(s) from {:?}", values.len(), path);
        Ok(Self {
            path,
            inner: MemoryStore::from_values(values),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, SettingValue> {
        self.inner.values()
    }

    /// Re-read the file. Only keys whose value changed are notified; a key
    /// deleted from the file is notified with no value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the current
    /// values are kept in that case.
    pub fn reload(&mut self) -> Result<Vec<String>> {
        let values = read_values(&self.path)?;
        let changed = self.inner.replace_all(values);
        info!("Reloaded preferences: {} key(s) changed", changed.len());
        Ok(changed)
    }

    /// Write every value as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self.inner.values())?;
        std::fs::write(&self.path, content)?;
        debug!("Flushed preferences to {:?}", self.path);
        Ok(())
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, SettingValue>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    warn_unknown_preferences(&content);
    Ok(serde_json::from_str(&content)?)
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: SettingValue) -> panelmenu_core::Result<()> {
        self.inner.set(key, value)?;
        self.flush().map_err(|e| match e {
            crate::DaemonError::Io(io) => panelmenu_core::Error::Io(io),
            crate::DaemonError::Json(json) => panelmenu_core::Error::Json(json),
            other => panelmenu_core::Error::Settings(other.to_string()),
        })
    }

    fn on_change(&mut self, key: &str, callback: ChangeCallback) -> SubscriptionId {
        self.inner.on_change(key, callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, content: Option<&str>) -> FileStore {
        let path = dir.path().join("preferences.json");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        FileStore::open(path).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, None);
        assert!(store.values().is_empty());
    }

    #[test]
    fn test_open_reads_typed_values() {
        let dir = TempDir::new().unwrap();
        let store = store_in(
            &dir,
            Some(r#"{"multi-monitor": true, "menu-height": 600, "menu-layout": "redmond", "pinned-apps": ["A", "", "a.desktop"]}"#),
        );
        assert_eq!(store.get("multi-monitor"), Some(SettingValue::Bool(true)));
        assert_eq!(store.get("menu-height"), Some(SettingValue::Int(600)));
        assert_eq!(store.get("menu-layout"), Some(SettingValue::Str("redmond".to_string())));
        assert_eq!(
            store.get("pinned-apps").unwrap().as_str_list().unwrap().len(),
            3
        );
    }

    #[test]
    fn test_set_writes_through() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, None);
        store.set("menu-layout", "plasma".into()).unwrap();

        let reopened = FileStore::open(store.path()).unwrap();
        assert_eq!(reopened.get("menu-layout"), Some(SettingValue::Str("plasma".to_string())));
    }

    #[test]
    fn test_reload_notifies_changed_keys_only() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, Some(r#"{"menu-layout": "arc", "menu-height": 500}"#));

        let seen = Rc::new(RefCell::new(Vec::new()));
        for key in ["menu-layout", "menu-height"] {
            let seen = Rc::clone(&seen);
            store.on_change(
                key,
                Box::new(move |key: &str, _: Option<&SettingValue>| seen.borrow_mut().push(key.to_string())),
            );
        }

        std::fs::write(store.path(), r#"{"menu-layout": "arc", "menu-height": 640}"#).unwrap();
        let changed = store.reload().unwrap();

        assert_eq!(changed, vec!["menu-height".to_string()]);
        assert_eq!(*seen.borrow(), vec!["menu-height".to_string()]);
    }

    #[test]
    fn test_reload_notifies_deleted_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(
            &dir,
            Some(r#"{"menu-layout": "arc", "pinned-apps": ["A", "", "a.desktop"]}"#),
        );

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.on_change(
            "pinned-apps",
            Box::new(move |_: &str, value: Option<&SettingValue>| sink.borrow_mut().push(value.is_some())),
        );

        std::fs::write(store.path(), r#"{"menu-layout": "arc"}"#).unwrap();
        let changed = store.reload().unwrap();

        assert_eq!(changed, vec!["pinned-apps".to_string()]);
        assert_eq!(*seen.borrow(), vec![false]);
        assert_eq!(store.get("pinned-apps"), None);
    }

    #[test]
    fn test_reload_keeps_values_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, Some(r#"{"menu-layout": "arc"}"#));

        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get("menu-layout"), Some(SettingValue::Str("arc".to_string())));
    }
}
