use std::collections::BTreeMap;

use panelmenu_types::SettingValue;
use tracing::debug;

use super::{ChangeCallback, SettingsStore, SubscriptionId};
use crate::Result;

struct Subscriber {
    id: SubscriptionId,
    key: String,
    callback: ChangeCallback,
}

/// In-memory preference store with synchronous change notification
#[derive(Default)]
pub struct MemoryStore {
    values: BTreeMap<String, SettingValue>,
    subscribers: Vec<Subscriber>,
    next_id: SubscriptionId,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("values", &self.values)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_values(values: BTreeMap<String, SettingValue>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, SettingValue> {
        &self.values
    }

    /// Re-deliver the current value of `key` to its subscribers without writing.
    pub fn notify(&mut self, key: &str) {
        if let Some(value) = self.values.get(key).cloned() {
            self.emit(key, Some(&value));
        }
    }

    /// Replace every value at once, notifying only keys whose value changed.
    /// A key missing from `values` counts as changed and is delivered as
    /// `None`.
    ///
    /// Returns the changed keys, removed ones last.
    pub fn replace_all(&mut self, values: BTreeMap<String, SettingValue>) -> Vec<String> {
        let mut changed: Vec<String> = values
            .iter()
            .filter(|(key, value)| self.values.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();

        let removed: Vec<String> = self
            .values
            .keys()
            .filter(|key| !values.contains_key(*key))
            .cloned()
            .collect();

        self.values = values;

        for key in &changed {
            self.notify(key);
        }
        for key in &removed {
            self.emit(key, None);
        }

        debug!(
            "Replaced preferences: {} changed, {} removed",
            changed.len(),
            removed.len()
        );

        changed.extend(removed);
        changed
    }

    fn emit(&mut self, key: &str, value: Option<&SettingValue>) {
        for sub in self.subscribers.iter_mut().filter(|s| s.key == key) {
            (sub.callback)(key, value);
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        self.emit(key, Some(&value));
        Ok(())
    }

    fn on_change(&mut self, key: &str, callback: ChangeCallback) -> SubscriptionId {
        self.next_id += 1;
        let id = self.next_id;
        self.subscribers.push(Subscriber {
            id,
            key: key.to_string(),
            callback,
        });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }
}
