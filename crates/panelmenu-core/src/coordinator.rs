//! Cross-surface open-state coordination.
//!
//! The coordinator is the only component that looks at more than one surface.
//! It keeps at most one popup open system-wide and decides which surface a
//! global toggle lands on. It trusts each surface's own bookkeeping and never
//! repairs a surface whose context menu and main popup disagree.

use std::time::Duration;

use panelmenu_types::{MonitorIndex, SurfaceStatus};
use tracing::{debug, info, warn};

use crate::host::{ApplicationInventory, WindowManager};
use crate::settings::{HotkeyBindings, MenuSettings, UpdateOp};
use crate::surface::{MenuSurface, SurfaceId, SurfaceOptions, SurfaceRole};

/// Which monitor a global toggle targets in multi-monitor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPolicy {
    /// The monitor holding the pointer or keyboard focus
    #[default]
    Pointer,
    /// Always the primary monitor
    Primary,
}

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub surface: SurfaceId,
    pub open: bool,
}

#[derive(Debug)]
pub struct MenuCoordinator {
    surfaces: Vec<MenuSurface>,
    runner: Option<MenuSurface>,
    multi_monitor: bool,
    policy: TargetPolicy,
    hotkeys: HotkeyBindings,
    options: SurfaceOptions,
    next_id: SurfaceId,
}

impl MenuCoordinator {
    #[must_use]
    pub fn new(options: SurfaceOptions) -> Self {
        Self {
            surfaces: Vec::new(),
            runner: None,
            multi_monitor: false,
            policy: TargetPolicy::default(),
            hotkeys: HotkeyBindings::default(),
            options,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn surfaces(&self) -> &[MenuSurface] {
        &self.surfaces
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&MenuSurface> {
        self.all().find(|s| s.id() == id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut MenuSurface> {
        self.surfaces
            .iter_mut()
            .chain(self.runner.as_mut())
            .find(|s| s.id() == id)
    }

    #[must_use]
    pub fn runner(&self) -> Option<&MenuSurface> {
        self.runner.as_ref()
    }

    #[must_use]
    pub fn multi_monitor(&self) -> bool {
        self.multi_monitor
    }

    #[must_use]
    pub fn policy(&self) -> TargetPolicy {
        self.policy
    }

    #[must_use]
    pub fn hotkeys(&self) -> &HotkeyBindings {
        &self.hotkeys
    }

    /// Every surface including the runner
    pub fn all(&self) -> impl Iterator<Item = &MenuSurface> {
        self.surfaces.iter().chain(self.runner.as_ref())
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut MenuSurface> {
        self.surfaces.iter_mut().chain(self.runner.as_mut())
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.all().filter(|s| s.is_open()).count()
    }

    #[must_use]
    pub fn open_context_count(&self) -> usize {
        self.all().filter(|s| s.is_context_menu_open()).count()
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<SurfaceStatus> {
        self.all().map(MenuSurface::status).collect()
    }

    /// Create a panel surface for `monitor`
    pub fn register(
        &mut self,
        monitor: MonitorIndex,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) -> SurfaceId {
        let id = self.allocate_id();
        self.surfaces.push(MenuSurface::new(
            id,
            SurfaceRole::Panel { monitor },
            self.options,
            settings,
            inventory,
        ));
        info!("Created menu surface {id} on monitor {monitor}");
        id
    }

    /// Destroy a surface. Returns `false` if no such surface exists.
    pub fn deregister(&mut self, id: SurfaceId) -> bool {
        if let Some(pos) = self.surfaces.iter().position(|s| s.id() == id) {
            let mut surface = self.surfaces.remove(pos);
            surface.destroy();
            info!("Destroyed menu surface {id}");
            return true;
        }
        if self.runner.as_ref().is_some_and(|r| r.id() == id) {
            if let Some(mut runner) = self.runner.take() {
                runner.destroy();
            }
            info!("Destroyed standalone runner {id}");
            return true;
        }
        false
    }

    /// Create or destroy the standalone runner
    pub fn set_runner_enabled(
        &mut self,
        enabled: bool,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) {
        match (enabled, self.runner.is_some()) {
            (true, false) => {
                let id = self.allocate_id();
                self.runner = Some(MenuSurface::new(
                    id,
                    SurfaceRole::Runner,
                    self.options,
                    settings,
                    inventory,
                ));
                info!("Created standalone runner {id}");
            }
            (false, true) => {
                if let Some(id) = self.runner.as_ref().map(MenuSurface::id) {
                    self.deregister(id);
                }
            }
            _ => {}
        }
    }

    /// Match surfaces to the monitor layout: one per monitor in multi-monitor
    /// mode, otherwise a single surface on `primary`.
    pub fn sync_monitors(
        &mut self,
        monitor_count: usize,
        primary: MonitorIndex,
        multi_monitor: bool,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) {
        self.multi_monitor = multi_monitor;
        let wanted: Vec<MonitorIndex> = if multi_monitor {
            (0..monitor_count).collect()
        } else {
            vec![primary.min(monitor_count.saturating_sub(1))]
        };

        let stale: Vec<SurfaceId> = self
            .surfaces
            .iter()
            .filter(|s| s.monitor().is_none_or(|m| !wanted.contains(&m)))
            .map(MenuSurface::id)
            .collect();
        for id in stale {
            self.deregister(id);
        }

        for monitor in wanted {
            if !self.surfaces.iter().any(|s| s.monitor() == Some(monitor)) {
                self.register(monitor, settings, inventory);
            }
        }
        self.surfaces.sort_by_key(|s| s.monitor());
        debug!("Synced surfaces: {} for {monitor_count} monitor(s)", self.surfaces.len());
    }

    /// Route a global toggle to the right surface.
    ///
    /// The runner is closed first. In multi-monitor mode every other
    /// surface's main popup and context popup are closed before the target
    /// toggles.
    pub fn toggle(&mut self, wm: &mut dyn WindowManager) -> Option<ToggleOutcome> {
        if let Some(runner) = self.runner.as_mut() {
            runner.close();
        }

        if !self.multi_monitor || self.surfaces.len() <= 1 {
            let id = self.surfaces.first()?.id();
            return self.toggle_surface(id);
        }

        let monitor = match self.policy {
            TargetPolicy::Primary => wm.primary_monitor(),
            TargetPolicy::Pointer => wm
                .current_monitor_for_pointer()
                .unwrap_or_else(|| wm.primary_monitor()),
        };
        let target = match self.surfaces.iter().find(|s| s.monitor() == Some(monitor)) {
            Some(surface) => surface,
            None => {
                warn!("No surface on monitor {monitor}, using the first one");
                self.surfaces.first()?
            }
        };
        let (target, target_monitor) = (target.id(), target.monitor());

        let outcome = self.toggle_surface(target)?;
        if let Some(monitor) = target_monitor.filter(|_| outcome.open) {
            wm.focus_monitor(monitor);
        }
        Some(outcome)
    }

    /// Toggle one surface directly, as a panel button click does
    pub fn toggle_surface(&mut self, id: SurfaceId) -> Option<ToggleOutcome> {
        self.surface(id)?;
        self.close_others(id);
        let surface = self.surface_mut(id)?;
        let open = surface.toggle();
        debug!("Surface {id} toggled {}", if open { "open" } else { "closed" });
        Some(ToggleOutcome { surface: id, open })
    }

    /// Toggle the standalone runner, closing every panel popup first.
    /// Returns `None` when the runner is disabled.
    pub fn toggle_runner(&mut self) -> Option<ToggleOutcome> {
        let id = self.runner.as_ref()?.id();
        self.close_others(id);
        let runner = self.runner.as_mut()?;
        let open = runner.toggle();
        Some(ToggleOutcome { surface: id, open })
    }

    /// Open a surface's context popup, closing every other popup
    pub fn open_context_menu(&mut self, id: SurfaceId) -> bool {
        if self.surface(id).is_none() {
            return false;
        }
        self.close_others(id);
        if let Some(surface) = self.surface_mut(id) {
            surface.close();
            surface.open_context_menu();
        }
        true
    }

    pub fn close_all(&mut self) {
        for surface in self.all_mut() {
            surface.close();
            surface.close_context_menu();
        }
    }

    fn close_others(&mut self, keep: SurfaceId) {
        for surface in self.all_mut().filter(|s| s.id() != keep) {
            if surface.is_open() {
                surface.close();
            }
            if surface.is_context_menu_open() {
                surface.close_context_menu();
            }
        }
    }

    /// Fan a routed update out to every surface and refresh the
    /// coordinator's own state.
    pub fn apply_update(
        &mut self,
        op: UpdateOp,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) {
        match op {
            UpdateOp::RepositionButton => {
                self.multi_monitor = settings.multi_monitor;
                self.policy = if settings.open_on_primary {
                    TargetPolicy::Primary
                } else {
                    TargetPolicy::Pointer
                };
                self.set_runner_enabled(settings.runner_enabled, settings, inventory);
            }
            UpdateOp::RebuildHotkeys => {
                if self.hotkeys != settings.hotkeys {
                    info!(
                        "Hotkeys: menu {:?}, runner {:?}",
                        settings.hotkeys.menu.accelerator(),
                        settings.hotkeys.runner.accelerator()
                    );
                }
                self.hotkeys = settings.hotkeys.clone();
            }
            _ => {}
        }

        for surface in self.all_mut() {
            surface.apply_update(op, settings, inventory);
        }
    }

    pub fn advance_timers(&mut self, now: Duration) -> usize {
        self.all_mut().map(|s| s.advance_timers(now)).sum()
    }

    fn allocate_id(&mut self) -> SurfaceId {
        self.next_id += 1;
        self.next_id
    }
}

impl Default for MenuCoordinator {
    fn default() -> Self {
        Self::new(SurfaceOptions::default())
    }
}
