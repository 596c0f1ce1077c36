//! Preference storage and change routing.
//!
//! The store itself is an external collaborator; [`SettingsStore`] is the seam
//! it is consumed through. [`MemoryStore`] is the in-process implementation the
//! daemon's file store and the tests build on.

mod dispatcher;
pub mod keys;
mod menu_settings;
mod store;

pub use dispatcher::{RoutedChange, SettingsDispatcher, UpdateTarget};
pub use keys::{Route, UpdateOp};
pub use menu_settings::{ButtonPosition, ButtonStyle, Hotkey, HotkeyBindings, MenuSettings};
pub use store::MemoryStore;

use crate::Result;
use panelmenu_types::SettingValue;

/// Handle returned by [`SettingsStore::on_change`]
pub type SubscriptionId = u64;

/// Called with the key and its new value after every write to a subscribed
/// key. The value is `None` when the key was removed and readers fall back to
/// the default.
pub type ChangeCallback = Box<dyn FnMut(&str, Option<&SettingValue>)>;

/// A typed key/value store that reports changes per key.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<SettingValue>;

    /// Write a value and notify the key's subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: SettingValue) -> Result<()>;

    fn on_change(&mut self, key: &str, callback: ChangeCallback) -> SubscriptionId;

    /// Returns `false` if the handle was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
