//! One popup menu instance.
//!
//! A surface owns everything a single popup shows: the category list, the
//! pinned grid, the search box and the navigation state. It never talks to
//! other surfaces; the coordinator drives cross-surface transitions.

use std::collections::HashMap;
use std::time::Duration;

use panelmenu_types::{AppDescriptor, MonitorIndex, PinnedApp, Point, Rect, SurfaceStatus};
use tracing::{debug, info, warn};

use crate::category::{self, CategoryItem, CategoryKind};
use crate::drag::{DragMotionResult, DragReorderSession, GridGeometry};
use crate::host::ApplicationInventory;
use crate::layout::{ActiveView, DefaultViewKind, LayoutKind, LayoutProfile};
use crate::navigation::NavigationPredictor;
use crate::search::{SearchHit, SearchSession};
use crate::settings::{ButtonPosition, ButtonStyle, MenuSettings, UpdateOp};
use crate::timer::TimerQueue;

pub type SurfaceId = u32;

/// Which popup a surface is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// Panel menu bound to a monitor
    Panel { monitor: MonitorIndex },
    /// The standalone runner, not bound to any panel
    Runner,
}

/// Events scheduled on a surface's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTimer {
    NavigationLeave,
}

/// Cell metrics of the pinned grid as laid out by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub origin: Point,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_width: 96.0,
            cell_height: 96.0,
            column_spacing: 6.0,
            row_spacing: 6.0,
            origin: Point::default(),
        }
    }
}

/// Panel button placement and look
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonState {
    pub position: ButtonPosition,
    pub offset: i64,
    pub style: ButtonStyle,
}

/// Construction parameters shared by every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    pub leave_delay: Duration,
    pub search_limit: usize,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            leave_delay: crate::navigation::DEFAULT_LEAVE_DELAY,
            search_limit: 30,
        }
    }
}

#[derive(Debug)]
pub struct MenuSurface {
    id: SurfaceId,
    role: SurfaceRole,
    open: bool,
    context_menu_open: bool,
    view: ActiveView,
    layout: LayoutProfile,
    default_view: DefaultViewKind,
    hover_enabled: bool,
    width: f64,
    height: f64,
    button: ButtonState,
    apps: Vec<AppDescriptor>,
    categories: Vec<CategoryItem>,
    pinned: Vec<PinnedApp>,
    pinned_columns: usize,
    grid: GridMetrics,
    predictor: NavigationPredictor,
    drag: Option<DragReorderSession>,
    search: SearchSession,
    timers: TimerQueue<SurfaceTimer>,
    updates: HashMap<UpdateOp, usize>,
}

impl MenuSurface {
    /// Create a surface and populate it from `settings`
    #[must_use]
    pub fn new(
        id: SurfaceId,
        role: SurfaceRole,
        options: SurfaceOptions,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) -> Self {
        let layout = Self::layout_for(role, settings);
        let mut surface = Self {
            id,
            role,
            open: false,
            context_menu_open: false,
            view: ActiveView::default(),
            layout,
            default_view: settings.default_view,
            hover_enabled: settings.hover_enabled(),
            width: 0.0,
            height: 0.0,
            button: ButtonState::default(),
            apps: Vec::new(),
            categories: Vec::new(),
            pinned: Vec::new(),
            pinned_columns: settings.pinned_columns,
            grid: GridMetrics::default(),
            predictor: NavigationPredictor::new(layout.submenu_side, options.leave_delay),
            drag: None,
            search: SearchSession::new(options.search_limit),
            timers: TimerQueue::new(),
            updates: HashMap::new(),
        };
        for op in UpdateOp::ALL {
            surface.apply(op, settings, inventory);
        }
        surface.updates.clear();
        surface
    }

    fn layout_for(role: SurfaceRole, settings: &MenuSettings) -> LayoutProfile {
        match role {
            SurfaceRole::Panel { .. } => settings.layout,
            SurfaceRole::Runner => LayoutKind::Runner.profile(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    #[must_use]
    pub fn monitor(&self) -> Option<MonitorIndex> {
        match self.role {
            SurfaceRole::Panel { monitor } => Some(monitor),
            SurfaceRole::Runner => None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_context_menu_open(&self) -> bool {
        self.context_menu_open
    }

    #[must_use]
    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutProfile {
        &self.layout
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn button(&self) -> &ButtonState {
        &self.button
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryItem] {
        &self.categories
    }

    #[must_use]
    pub fn pinned(&self) -> &[PinnedApp] {
        &self.pinned
    }

    #[must_use]
    pub fn pinned_columns(&self) -> usize {
        self.pinned_columns
    }

    #[must_use]
    pub fn predictor(&self) -> &NavigationPredictor {
        &self.predictor
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragReorderSession> {
        self.drag.as_ref()
    }

    /// Index of the dimmed tile while a drag is in flight
    #[must_use]
    pub fn dimmed_tile(&self) -> Option<usize> {
        self.drag.as_ref().map(DragReorderSession::dragged)
    }

    #[must_use]
    pub fn search_results(&self) -> &[SearchHit] {
        self.search.results()
    }

    /// How many times `op` has been applied since creation
    #[must_use]
    pub fn update_count(&self, op: UpdateOp) -> usize {
        self.updates.get(&op).copied().unwrap_or(0)
    }

    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.context_menu_open = false;
        self.view = self.default_view();
        debug!("Surface {} opened on {}", self.id, self.view.label());
    }

    /// Close the popup, dropping every piece of transient state
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.predictor.reset(&mut self.timers);
        self.cancel_drag();
        self.search.clear();
        self.view = self.default_view();
        debug!("Surface {} closed", self.id);
    }

    /// Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    pub fn open_context_menu(&mut self) {
        self.context_menu_open = true;
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu_open = false;
    }

    /// Tear the surface down. A drag in flight is cancelled, never committed.
    pub fn destroy(&mut self) {
        self.cancel_drag();
        self.context_menu_open = false;
        self.close();
        self.timers.clear();
    }

    pub fn set_grid_metrics(&mut self, metrics: GridMetrics) {
        self.grid = metrics;
    }

    /// Record where the host laid out a category row
    pub fn mount_category(&mut self, kind: &CategoryKind, rect: Rect) -> bool {
        match self.categories.iter_mut().find(|c| &c.kind == kind) {
            Some(item) => {
                item.mount(rect);
                true
            }
            None => false,
        }
    }

    pub fn unmount_category(&mut self, kind: &CategoryKind) {
        if let Some(item) = self.categories.iter_mut().find(|c| &c.kind == kind) {
            item.unmount();
        }
    }

    /// Pointer entered or moved over a category row.
    ///
    /// Returns whether the row became (or stayed) the active view.
    pub fn on_category_hover(&mut self, kind: &CategoryKind, pointer: Point) -> bool {
        self.predictor.cancel_leave(&mut self.timers);

        if !self.open || self.drag.is_some() || !self.hover_enabled || !self.view.is_hover_navigable() {
            return false;
        }
        let Some(item) = self.categories.iter().find(|c| &c.kind == kind) else {
            return false;
        };
        if !item.hover_activation {
            return false;
        }

        if !self.predictor.should_activate(kind, pointer, &self.categories) {
            return false;
        }
        self.view = ActiveView::Category(kind.clone());
        true
    }

    pub fn on_category_click(&mut self, kind: &CategoryKind) -> bool {
        if !self.open || !self.categories.iter().any(|c| &c.kind == kind) {
            return false;
        }
        self.search.clear();
        self.view = ActiveView::Category(kind.clone());
        true
    }

    /// Pointer left the whole category list
    pub fn on_list_leave(&mut self, now: Duration) {
        if self.open {
            self.predictor
                .list_left(&mut self.timers, now, SurfaceTimer::NavigationLeave);
        }
    }

    /// Fire due timers. Returns how many fired.
    pub fn advance_timers(&mut self, now: Duration) -> usize {
        let fired = self.timers.fire_due(now);
        for (handle, event) in &fired {
            match event {
                SurfaceTimer::NavigationLeave => {
                    if self.predictor.leave_fired(*handle) {
                        debug!("Surface {} forgot its navigating row", self.id);
                    }
                }
            }
        }
        fired.len()
    }

    /// Update the search query. A blank query returns to the default view.
    pub fn search(&mut self, query: &str) -> &[SearchHit] {
        if self.search.update(query, &self.apps) {
            if self.view != ActiveView::Search {
                self.predictor.reset(&mut self.timers);
            }
            self.view = ActiveView::Search;
        } else if self.view == ActiveView::Search {
            self.view = self.default_view();
        }
        self.search.results()
    }

    /// Start dragging pinned tile `index`. Returns whether a session began.
    pub fn drag_begin(&mut self, index: usize, pointer: Point) -> bool {
        if self.drag.is_some() || !self.layout.show_pinned_grid {
            return false;
        }
        let geometry = GridGeometry::new(self.pinned_columns, self.grid.cell_width, self.grid.cell_height)
            .with_spacing(self.grid.column_spacing, self.grid.row_spacing)
            .with_origin(self.grid.origin);
        let Some(session) = DragReorderSession::begin(self.pinned.len(), index, pointer, geometry) else {
            return false;
        };
        self.predictor.reset(&mut self.timers);
        self.drag = Some(session);
        true
    }

    pub fn drag_motion(&mut self, pointer: Point) -> DragMotionResult {
        let Some(session) = self.drag.as_mut() else {
            return DragMotionResult::Ignored;
        };
        if session.is_stale(self.pinned_columns) {
            warn!("Grid columns changed mid-drag on surface {}, aborting", self.id);
            self.cancel_drag();
            return DragMotionResult::Ignored;
        }
        session.motion(pointer)
    }

    /// Finish the drag. Returns the reordered list when the order changed.
    pub fn drag_end(&mut self) -> Option<Vec<PinnedApp>> {
        let commit = self.drag.take()?.end();
        if !commit.changed {
            return None;
        }
        self.pinned = commit.apply(&self.pinned);
        self.refresh_pinned_category();
        info!("Pinned order changed on surface {}", self.id);
        Some(self.pinned.clone())
    }

    /// Drop the drag. The pinned list was never touched, so nothing to undo.
    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            session.cancel();
        }
    }

    /// Run one routed update. Every handler may be repeated safely.
    pub fn apply_update(
        &mut self,
        op: UpdateOp,
        settings: &MenuSettings,
        inventory: &dyn ApplicationInventory,
    ) {
        self.apply(op, settings, inventory);
        *self.updates.entry(op).or_default() += 1;
    }

    fn apply(&mut self, op: UpdateOp, settings: &MenuSettings, inventory: &dyn ApplicationInventory) {
        match op {
            UpdateOp::RepositionButton => {
                self.button.position = settings.button_position;
                self.button.offset = settings.button_offset;
            }
            UpdateOp::RestyleButton => {
                self.button.style = settings.button_style.clone();
            }
            UpdateOp::ResizeMenu => {
                (self.width, self.height) = match self.role {
                    SurfaceRole::Panel { .. } => (settings.menu_width, settings.menu_height),
                    SurfaceRole::Runner => (settings.runner_width, settings.runner_height),
                };
            }
            UpdateOp::ReloadContent => {
                self.layout = Self::layout_for(self.role, settings);
                // Unset size keys fall back to the layout's own size.
                self.apply(UpdateOp::ResizeMenu, settings, inventory);
                self.default_view = match self.role {
                    SurfaceRole::Panel { .. } => settings.default_view,
                    SurfaceRole::Runner => self.layout.default_view,
                };
                self.hover_enabled = settings.hover_enabled() && self.layout.hover_activation;
                self.predictor.set_side(self.layout.submenu_side);
                self.set_columns(settings.pinned_columns);
                self.rebuild_categories(settings, inventory);
                if self.view != ActiveView::Search {
                    self.view = self.default_view();
                }
            }
            UpdateOp::RebuildCategoryList => {
                self.rebuild_categories(settings, inventory);
                let missing = matches!(
                    &self.view,
                    ActiveView::Category(kind) if !self.categories.iter().any(|c| &c.kind == kind)
                );
                if missing {
                    self.view = self.default_view();
                }
            }
            UpdateOp::RebuildPinnedList => {
                if self.drag.is_some() {
                    warn!("Pinned list replaced mid-drag on surface {}, aborting", self.id);
                    self.cancel_drag();
                }
                self.pinned.clone_from(&settings.pinned);
                self.set_columns(settings.pinned_columns);
                self.refresh_pinned_category();
            }
            UpdateOp::RebuildHotkeys => {}
        }
    }

    fn set_columns(&mut self, columns: usize) {
        if self.pinned_columns == columns {
            return;
        }
        if self.drag.as_ref().is_some_and(|d| d.is_stale(columns)) {
            warn!("Grid columns changed mid-drag on surface {}, aborting", self.id);
            self.cancel_drag();
        }
        self.pinned_columns = columns;
    }

    fn rebuild_categories(&mut self, settings: &MenuSettings, inventory: &dyn ApplicationInventory) {
        self.apps = inventory.applications();
        self.categories = category::build_categories(
            &settings.extra_categories,
            &self.pinned,
            inventory,
            self.layout.hover_activation,
        );
        // Rows were rebuilt; the old navigating row no longer exists.
        self.predictor.reset(&mut self.timers);
        if self.search.is_active() {
            let query = self.search.query().to_string();
            self.search.update(&query, &self.apps);
        }
    }

    fn refresh_pinned_category(&mut self) {
        let commands: Vec<String> = self.pinned.iter().map(|p| p.command.clone()).collect();
        if let Some(item) = self
            .categories
            .iter_mut()
            .find(|c| c.kind == CategoryKind::Pinned)
        {
            item.apps = commands;
        }
    }

    fn default_view(&self) -> ActiveView {
        self.default_view.policy().default_view(&self.categories)
    }

    #[must_use]
    pub fn status(&self) -> SurfaceStatus {
        SurfaceStatus {
            id: self.id,
            monitor: self.monitor(),
            standalone: self.role == SurfaceRole::Runner,
            open: self.open,
            context_menu_open: self.context_menu_open,
            view: self.view.label(),
            pinned_count: self.pinned.len(),
            dragging: self.drag.is_some(),
        }
    }
}
