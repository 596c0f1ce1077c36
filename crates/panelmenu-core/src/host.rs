//! Host collaborators consumed by the engine.
//!
//! The window manager and the application inventory belong to the desktop
//! shell; the engine only needs the narrow views below.

use panelmenu_types::{AppDescriptor, MonitorIndex, Rect};

/// Monitor and focus information from the window manager
pub trait WindowManager {
    /// Monitor geometry, indexed by [`MonitorIndex`]
    fn monitors(&self) -> Vec<Rect>;

    /// Monitor under the pointer or holding keyboard focus, if known
    fn current_monitor_for_pointer(&self) -> Option<MonitorIndex>;

    fn primary_monitor(&self) -> MonitorIndex;

    /// Move keyboard focus to the given monitor before a popup opens there
    fn focus_monitor(&mut self, monitor: MonitorIndex);
}

/// Installed applications and their usage ranking
pub trait ApplicationInventory {
    fn applications(&self) -> Vec<AppDescriptor>;

    /// App ids, most used first
    fn most_used(&self) -> Vec<String>;
}

/// Fixed inventory, used when no live source is attached
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    pub apps: Vec<AppDescriptor>,
    pub most_used: Vec<String>,
}

impl StaticInventory {
    #[must_use]
    pub fn new(apps: Vec<AppDescriptor>) -> Self {
        Self {
            apps,
            most_used: Vec::new(),
        }
    }
}

impl ApplicationInventory for StaticInventory {
    fn applications(&self) -> Vec<AppDescriptor> {
        self.apps.clone()
    }

    fn most_used(&self) -> Vec<String> {
        self.most_used.clone()
    }
}
