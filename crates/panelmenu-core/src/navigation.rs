//! Hover prediction for category lists.
//!
//! When a category opens its contents beside the list, the pointer usually
//! travels diagonally toward them and crosses sibling rows on the way. The
//! predictor keeps the current category active while the pointer stays inside
//! a cone spanning from the last reference point to the far edge of the
//! navigating row, widened above and below by the horizontal travel distance.

use std::time::Duration;

use panelmenu_types::{Point, Rect};
use tracing::{debug, trace};

use crate::category::{CategoryItem, CategoryKind};
use crate::layout::SubmenuSide;
use crate::timer::{TimerHandle, TimerQueue};

/// Default delay before leaving the list forgets the navigating row
pub const DEFAULT_LEAVE_DELAY: Duration = Duration::from_millis(200);

const AREA_TOLERANCE: f64 = 1e-9;

/// Triangle used for the safe-corridor test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Triangle {
    #[must_use]
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        area(self.a, self.b, self.c)
    }

    /// Area-sum test: the three sub-triangles formed with `p` add up to the
    /// whole exactly when `p` is inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let whole = self.area();
        let parts = area(p, self.b, self.c) + area(self.a, p, self.c) + area(self.a, self.b, p);
        (parts - whole).abs() <= AREA_TOLERANCE * whole.max(1.0)
    }
}

/// Shoelace area of the triangle `abc`
#[must_use]
pub fn area(a: Point, b: Point, c: Point) -> f64 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

/// Per-surface navigation state.
///
/// At most one category is navigating at a time. The leave timer lives in the
/// owning surface's [`TimerQueue`]; the predictor only keeps its handle.
#[derive(Debug, Clone)]
pub struct NavigationPredictor {
    side: SubmenuSide,
    leave_delay: Duration,
    navigating: Option<CategoryKind>,
    reference: Option<Point>,
    leave_timer: Option<TimerHandle>,
}

impl Default for NavigationPredictor {
    fn default() -> Self {
        Self::new(SubmenuSide::Right, DEFAULT_LEAVE_DELAY)
    }
}

impl NavigationPredictor {
    #[must_use]
    pub fn new(side: SubmenuSide, leave_delay: Duration) -> Self {
        Self {
            side,
            leave_delay,
            navigating: None,
            reference: None,
            leave_timer: None,
        }
    }

    pub fn set_side(&mut self, side: SubmenuSide) {
        self.side = side;
    }

    #[must_use]
    pub fn navigating(&self) -> Option<&CategoryKind> {
        self.navigating.as_ref()
    }

    #[must_use]
    pub fn reference(&self) -> Option<Point> {
        self.reference
    }

    #[must_use]
    pub fn leave_timer(&self) -> Option<TimerHandle> {
        self.leave_timer
    }

    /// Decide whether hovering `candidate` at `pointer` should switch to it.
    ///
    /// `categories` is the surface's current list, used to read the
    /// navigating row's rectangle. An unmounted or missing row counts as no
    /// navigating row at all.
    pub fn should_activate(
        &mut self,
        candidate: &CategoryKind,
        pointer: Point,
        categories: &[CategoryItem],
    ) -> bool {
        let Some(current) = self.navigating.clone() else {
            self.switch_to(candidate, pointer);
            return true;
        };

        if &current == candidate {
            self.reference = Some(pointer);
            return true;
        }

        let rect = categories
            .iter()
            .find(|c| c.kind == current)
            .and_then(CategoryItem::rect);
        let (Some(rect), Some(reference)) = (rect, self.reference) else {
            debug!("Navigating row '{}' has no geometry, activating", current.label());
            self.switch_to(candidate, pointer);
            return true;
        };

        let corridor = corridor(reference, rect, self.side);
        if corridor.contains(pointer) {
            trace!(
                "Pointer ({}, {}) inside corridor of '{}'",
                pointer.x,
                pointer.y,
                current.label()
            );
            return false;
        }

        self.switch_to(candidate, pointer);
        true
    }

    /// Corridor for the current navigating row, if it has geometry
    #[must_use]
    pub fn current_corridor(&self, categories: &[CategoryItem]) -> Option<Triangle> {
        let current = self.navigating.as_ref()?;
        let rect = categories.iter().find(|c| &c.kind == current)?.rect()?;
        Some(corridor(self.reference?, rect, self.side))
    }

    /// The pointer left the list; forget the navigating row after the delay.
    pub fn list_left<E>(&mut self, timers: &mut TimerQueue<E>, now: Duration, event: E) {
        self.cancel_leave(timers);
        self.leave_timer = Some(timers.schedule(now, self.leave_delay, event));
    }

    pub fn cancel_leave<E>(&mut self, timers: &mut TimerQueue<E>) {
        if let Some(handle) = self.leave_timer.take() {
            timers.cancel(handle);
        }
    }

    /// Handle a fired leave timer. Stale handles are ignored.
    pub fn leave_fired(&mut self, handle: TimerHandle) -> bool {
        if self.leave_timer != Some(handle) {
            return false;
        }
        self.leave_timer = None;
        self.navigating = None;
        self.reference = None;
        true
    }

    pub fn reset<E>(&mut self, timers: &mut TimerQueue<E>) {
        self.cancel_leave(timers);
        self.navigating = None;
        self.reference = None;
    }

    fn switch_to(&mut self, candidate: &CategoryKind, pointer: Point) {
        self.navigating = Some(candidate.clone());
        self.reference = Some(pointer);
    }
}

/// Build the cone from `reference` toward the side the contents open on.
#[must_use]
pub fn corridor(reference: Point, rect: Rect, side: SubmenuSide) -> Triangle {
    let edge = match side {
        SubmenuSide::Right => rect.right(),
        SubmenuSide::Left => rect.x,
    };
    let delta = (edge - reference.x).abs();
    let apex_x = match side {
        SubmenuSide::Right => edge + delta,
        SubmenuSide::Left => edge - delta,
    };
    Triangle::new(
        reference,
        Point::new(apex_x, rect.y - delta),
        Point::new(apex_x, rect.bottom() + delta),
    )
}
