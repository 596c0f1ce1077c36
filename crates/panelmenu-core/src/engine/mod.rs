//! Composition root for the menu core.
//!
//! [`MenuEngine`] owns the preference store, the dispatcher that routes its
//! changes, the coordinator with every surface, and the host collaborators.
//! Every entry point that writes preferences pumps the dispatcher before
//! returning, so callers always observe a fully updated state.

use std::time::Duration;

use panelmenu_types::{AppDescriptor, Point, Rect, SettingValue, SurfaceStatus};
use tracing::{debug, info};

use crate::category::CategoryKind;
use crate::coordinator::{MenuCoordinator, ToggleOutcome};
use crate::drag::DragMotionResult;
use crate::host::{ApplicationInventory, WindowManager};
use crate::pinned;
use crate::search::SearchHit;
use crate::settings::{
    MenuSettings, SettingsDispatcher, SettingsStore, UpdateOp, UpdateTarget, keys,
};
use crate::surface::{GridMetrics, MenuSurface, SurfaceId, SurfaceOptions};
use crate::{Error, Result};

/// Menu core bound to one preference store and one host
pub struct MenuEngine<S: SettingsStore, W: WindowManager> {
    store: S,
    dispatcher: SettingsDispatcher,
    coordinator: MenuCoordinator,
    wm: W,
    inventory: Box<dyn ApplicationInventory>,
}

/// Applies routed updates with a fresh settings snapshot per delivery
struct Apply<'a, W: WindowManager> {
    coordinator: &'a mut MenuCoordinator,
    wm: &'a W,
    inventory: &'a dyn ApplicationInventory,
}

impl<W: WindowManager> UpdateTarget for Apply<'_, W> {
    fn apply_update(&mut self, op: UpdateOp, store: &dyn SettingsStore) {
        let settings = MenuSettings::load(store);
        self.coordinator.apply_update(op, &settings, self.inventory);
        if op == UpdateOp::RepositionButton {
            // multi-monitor and primary-monitor keys can add or remove surfaces
            self.coordinator.sync_monitors(
                self.wm.monitors().len(),
                self.wm.primary_monitor(),
                settings.multi_monitor,
                &settings,
                self.inventory,
            );
        }
    }
}

impl<S: SettingsStore, W: WindowManager> MenuEngine<S, W> {
    /// Build the engine and create the initial surfaces
    pub fn new(
        mut store: S,
        wm: W,
        inventory: Box<dyn ApplicationInventory>,
        options: SurfaceOptions,
    ) -> Self {
        let mut dispatcher = SettingsDispatcher::new();
        dispatcher.attach(&mut store);

        let mut coordinator = MenuCoordinator::new(options);
        let settings = MenuSettings::load(&store);
        coordinator.apply_update(UpdateOp::RepositionButton, &settings, inventory.as_ref());
        coordinator.apply_update(UpdateOp::RebuildHotkeys, &settings, inventory.as_ref());
        coordinator.sync_monitors(
            wm.monitors().len(),
            wm.primary_monitor(),
            settings.multi_monitor,
            &settings,
            inventory.as_ref(),
        );
        info!(
            "Menu engine ready: {} surface(s), layout {:?}",
            coordinator.surfaces().len(),
            settings.layout.kind
        );

        Self {
            store,
            dispatcher,
            coordinator,
            wm,
            inventory,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access.
    ///
    /// Writes made here only queue their handlers. Surfaces keep their old
    /// state until [`MenuEngine::pump`] runs. [`MenuEngine::toggle`] and
    /// [`MenuEngine::set_preference`] pump first, so a toggle never acts on
    /// a stale layout.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn window_manager(&self) -> &W {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut W {
        &mut self.wm
    }

    #[must_use]
    pub fn coordinator(&self) -> &MenuCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&MenuSurface> {
        self.coordinator.surface(id)
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<SurfaceStatus> {
        self.coordinator.statuses()
    }

    /// Deliver queued preference changes. Returns how many handlers ran.
    pub fn pump(&mut self) -> usize {
        let mut target = Apply {
            coordinator: &mut self.coordinator,
            wm: &self.wm,
            inventory: self.inventory.as_ref(),
        };
        let delivered = self.dispatcher.pump(&mut target, &self.store);
        if delivered > 0 {
            debug!("Delivered {delivered} preference change(s)");
        }
        delivered
    }

    /// Write one preference and apply its effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn set_preference(&mut self, key: &str, value: SettingValue) -> Result<usize> {
        self.store.set(key, value)?;
        Ok(self.pump())
    }

    /// Global toggle entry point
    pub fn toggle(&mut self) -> Option<ToggleOutcome> {
        self.pump();
        self.coordinator.toggle(&mut self.wm)
    }

    pub fn toggle_surface(&mut self, id: SurfaceId) -> Option<ToggleOutcome> {
        self.coordinator.toggle_surface(id)
    }

    pub fn toggle_runner(&mut self) -> Option<ToggleOutcome> {
        self.coordinator.toggle_runner()
    }

    pub fn open_context_menu(&mut self, id: SurfaceId) -> bool {
        self.coordinator.open_context_menu(id)
    }

    pub fn close_all(&mut self) {
        self.coordinator.close_all();
    }

    /// Re-read the monitor layout from the window manager
    pub fn monitors_changed(&mut self) {
        let settings = MenuSettings::load(&self.store);
        self.coordinator.sync_monitors(
            self.wm.monitors().len(),
            self.wm.primary_monitor(),
            settings.multi_monitor,
            &settings,
            self.inventory.as_ref(),
        );
    }

    /// Swap the application inventory and rebuild category lists
    pub fn set_inventory(&mut self, inventory: Box<dyn ApplicationInventory>) {
        self.inventory = inventory;
        let settings = MenuSettings::load(&self.store);
        self.coordinator
            .apply_update(UpdateOp::RebuildCategoryList, &settings, self.inventory.as_ref());
    }

    pub fn advance_timers(&mut self, now: Duration) -> usize {
        self.coordinator.advance_timers(now)
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn mount_category(&mut self, id: SurfaceId, kind: &CategoryKind, rect: Rect) -> Result<bool> {
        Ok(self.surface_mut(id)?.mount_category(kind, rect))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn set_grid_metrics(&mut self, id: SurfaceId, metrics: GridMetrics) -> Result<()> {
        self.surface_mut(id)?.set_grid_metrics(metrics);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn hover_category(&mut self, id: SurfaceId, kind: &CategoryKind, pointer: Point) -> Result<bool> {
        Ok(self.surface_mut(id)?.on_category_hover(kind, pointer))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn click_category(&mut self, id: SurfaceId, kind: &CategoryKind) -> Result<bool> {
        Ok(self.surface_mut(id)?.on_category_click(kind))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn leave_category_list(&mut self, id: SurfaceId, now: Duration) -> Result<()> {
        self.surface_mut(id)?.on_list_leave(now);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn search(&mut self, id: SurfaceId, query: &str) -> Result<Vec<SearchHit>> {
        Ok(self.surface_mut(id)?.search(query).to_vec())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn drag_begin(&mut self, id: SurfaceId, index: usize, pointer: Point) -> Result<bool> {
        Ok(self.surface_mut(id)?.drag_begin(index, pointer))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn drag_motion(&mut self, id: SurfaceId, pointer: Point) -> Result<DragMotionResult> {
        Ok(self.surface_mut(id)?.drag_motion(pointer))
    }

    /// Finish a drag and persist the new order if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] for a bad id, or a store error if
    /// persisting fails.
    pub fn drag_end(&mut self, id: SurfaceId) -> Result<bool> {
        let Some(order) = self.surface_mut(id)?.drag_end() else {
            return Ok(false);
        };
        self.persist_pinned(&order)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSurface`] if `id` is not a live surface.
    pub fn drag_cancel(&mut self, id: SurfaceId) -> Result<()> {
        self.surface_mut(id)?.cancel_drag();
        Ok(())
    }

    /// Pin an application. Returns `false` if it was already pinned.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn pin_app(&mut self, app: &AppDescriptor) -> Result<bool> {
        match pinned::pin(&self.current_pinned(), app.to_pinned()) {
            Some(next) => self.persist_pinned(&next).map(|()| true),
            None => Ok(false),
        }
    }

    /// Unpin every entry running `command`. Returns `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn unpin_app(&mut self, command: &str) -> Result<bool> {
        match pinned::unpin(&self.current_pinned(), command) {
            Some(next) => self.persist_pinned(&next).map(|()| true),
            None => Ok(false),
        }
    }

    fn current_pinned(&self) -> Vec<panelmenu_types::PinnedApp> {
        MenuSettings::load(&self.store).pinned
    }

    /// Last writer wins: the write re-enters the dispatcher and every
    /// surface reloads its pinned list from the store.
    fn persist_pinned(&mut self, apps: &[panelmenu_types::PinnedApp]) -> Result<()> {
        self.store
            .set(keys::PINNED_APPS, SettingValue::StrList(pinned::flatten(apps)))?;
        self.pump();
        info!("Persisted {} pinned app(s)", apps.len());
        Ok(())
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut MenuSurface> {
        self.coordinator
            .surface_mut(id)
            .ok_or(Error::UnknownSurface(id))
    }
}

impl<S: SettingsStore, W: WindowManager> Drop for MenuEngine<S, W> {
    fn drop(&mut self) {
        self.dispatcher.detach(&mut self.store);
    }
}
