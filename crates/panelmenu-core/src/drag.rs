//! Drag-to-reorder on the pinned grid.
//!
//! A session snapshots the grid geometry when the drag begins and keeps a
//! preview order of item indices that reflows as the pointer crosses cells.
//! Nothing is persisted here: [`DragReorderSession::end`] hands back the final
//! order and the owner decides what to write.

use panelmenu_types::Point;
use tracing::{debug, trace, warn};

/// Grid geometry captured at drag start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub origin: Point,
}

impl GridGeometry {
    #[must_use]
    pub fn new(columns: usize, cell_width: f64, cell_height: f64) -> Self {
        Self {
            columns,
            cell_width,
            cell_height,
            column_spacing: 0.0,
            row_spacing: 0.0,
            origin: Point::default(),
        }
    }

    #[must_use]
    pub fn with_spacing(mut self, column_spacing: f64, row_spacing: f64) -> Self {
        self.column_spacing = column_spacing;
        self.row_spacing = row_spacing;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn rows_for(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.columns.max(1))
    }

    #[must_use]
    pub fn cell_of_index(&self, index: usize) -> GridCell {
        let columns = self.columns.max(1);
        GridCell {
            col: index % columns,
            row: index / columns,
        }
    }

    /// Cell under `pointer`, clamped to the cells `item_count` items occupy
    #[must_use]
    pub fn cell_at(&self, pointer: Point, item_count: usize) -> GridCell {
        let columns = self.columns.max(1);
        let last_row = self.rows_for(item_count).saturating_sub(1);

        let col = step_index(pointer.x - self.origin.x, self.cell_width + self.column_spacing)
            .min(columns - 1);
        let row = step_index(pointer.y - self.origin.y, self.cell_height + self.row_spacing)
            .min(last_row);

        let flat = (row * columns + col).min(item_count.saturating_sub(1));
        self.cell_of_index(flat)
    }
}

// Negative offsets clamp to zero; the float-to-usize cast saturates
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn step_index(offset: f64, step: f64) -> usize {
    if step <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / step).floor().max(0.0) as usize
}

/// A row-major grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn flat(&self, columns: usize) -> usize {
        self.row * columns + self.col
    }
}

/// Outcome of one motion tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMotionResult {
    /// Keep dragging; `reflowed` is false when the target cell did not change
    Continue { cell: GridCell, reflowed: bool },
    /// No session, or the session's geometry no longer matches the grid
    Ignored,
}

/// Result of a finished drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragCommit {
    /// Indices into the pre-drag list, in their new order
    pub order: Vec<usize>,
    pub changed: bool,
}

impl DragCommit {
    /// Apply the order to the list the session was started on
    #[must_use]
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.order.iter().filter_map(|&i| items.get(i).cloned()).collect()
    }
}

/// One pointer drag over the pinned grid
#[derive(Debug, Clone)]
pub struct DragReorderSession {
    geometry: GridGeometry,
    dragged: usize,
    origin_pointer: Point,
    origin_cell: GridCell,
    target: GridCell,
    order: Vec<usize>,
}

impl DragReorderSession {
    /// Start dragging item `dragged` of `item_count`.
    ///
    /// Returns `None` if the index is out of range or the grid has no columns.
    #[must_use]
    pub fn begin(
        item_count: usize,
        dragged: usize,
        pointer: Point,
        geometry: GridGeometry,
    ) -> Option<Self> {
        if dragged >= item_count || geometry.columns == 0 {
            warn!("Rejected drag of item {dragged} in a {}-column grid of {item_count}", geometry.columns);
            return None;
        }
        let origin_cell = geometry.cell_of_index(dragged);
        debug!("Drag started on item {dragged} at {origin_cell:?}");
        Some(Self {
            geometry,
            dragged,
            origin_pointer: pointer,
            origin_cell,
            target: origin_cell,
            order: (0..item_count).collect(),
        })
    }

    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn dragged(&self) -> usize {
        self.dragged
    }

    #[must_use]
    pub fn origin_pointer(&self) -> Point {
        self.origin_pointer
    }

    #[must_use]
    pub fn origin_cell(&self) -> GridCell {
        self.origin_cell
    }

    #[must_use]
    pub fn target(&self) -> GridCell {
        self.target
    }

    /// Current preview order
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Whether the grid now has a different column count than the snapshot
    #[must_use]
    pub fn is_stale(&self, columns: usize) -> bool {
        self.geometry.columns != columns
    }

    pub fn motion(&mut self, pointer: Point) -> DragMotionResult {
        let cell = self.geometry.cell_at(pointer, self.order.len());
        if cell == self.target {
            return DragMotionResult::Continue {
                cell,
                reflowed: false,
            };
        }

        let flat = cell.flat(self.geometry.columns);
        let mut others: Vec<usize> = self
            .order
            .iter()
            .copied()
            .filter(|&i| i != self.dragged)
            .collect();
        others.insert(flat.min(others.len()), self.dragged);
        self.order = others;
        self.target = cell;

        trace!("Drag reflow: item {} -> {cell:?}", self.dragged);
        DragMotionResult::Continue {
            cell,
            reflowed: true,
        }
    }

    /// Finish the drag and read back the final row-major order.
    #[must_use]
    pub fn end(self) -> DragCommit {
        let changed = self.order.iter().enumerate().any(|(pos, &i)| pos != i);
        debug!(
            "Drag ended on item {} at {:?} (changed: {changed})",
            self.dragged, self.target
        );
        DragCommit {
            order: self.order,
            changed,
        }
    }

    /// Abandon the drag. The pre-drag order is the identity, so callers only
    /// need to re-render from their unchanged list.
    pub fn cancel(self) {
        debug!("Drag cancelled on item {}", self.dragged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridGeometry {
        GridGeometry::new(3, 50.0, 40.0)
            .with_spacing(10.0, 5.0)
            .with_origin(Point::new(100.0, 200.0))
    }

    #[test]
    fn test_cell_at_uses_spacing_and_origin() {
        let g = grid();
        assert_eq!(g.cell_at(Point::new(100.0, 200.0), 9), GridCell::new(0, 0));
        assert_eq!(g.cell_at(Point::new(161.0, 200.0), 9), GridCell::new(1, 0));
        assert_eq!(g.cell_at(Point::new(221.0, 246.0), 9), GridCell::new(2, 1));
    }

    #[test]
    fn test_cell_at_clamps_outside_grid() {
        let g = grid();
        assert_eq!(g.cell_at(Point::new(0.0, 0.0), 9), GridCell::new(0, 0));
        assert_eq!(g.cell_at(Point::new(9000.0, 9000.0), 9), GridCell::new(2, 2));
    }

    #[test]
    fn test_cell_at_clamps_to_last_item_in_partial_row() {
        let g = grid();
        // 7 items: the last row holds a single item at column 0.
        assert_eq!(g.cell_at(Point::new(9000.0, 9000.0), 7), GridCell::new(0, 2));
    }

    #[test]
    fn test_motion_reflows_once_per_cell() {
        let mut session = DragReorderSession::begin(5, 0, Point::new(100.0, 200.0), grid()).unwrap();

        let first = session.motion(Point::new(225.0, 210.0));
        assert_eq!(
            first,
            DragMotionResult::Continue {
                cell: GridCell::new(2, 0),
                reflowed: true
            }
        );
        assert_eq!(session.order(), &[1, 2, 0, 3, 4]);

        let again = session.motion(Point::new(230.0, 215.0));
        assert_eq!(
            again,
            DragMotionResult::Continue {
                cell: GridCell::new(2, 0),
                reflowed: false
            }
        );
    }

    #[test]
    fn test_end_reports_commit() {
        let mut session = DragReorderSession::begin(4, 3, Point::new(130.0, 250.0), grid()).unwrap();
        session.motion(Point::new(100.0, 200.0));
        let commit = session.end();

        assert!(commit.changed);
        assert_eq!(commit.order, vec![3, 0, 1, 2]);
        assert_eq!(commit.apply(&["a", "b", "c", "d"]), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_returning_to_origin_is_unchanged() {
        let mut session = DragReorderSession::begin(4, 1, Point::new(170.0, 210.0), grid()).unwrap();
        session.motion(Point::new(225.0, 210.0));
        session.motion(Point::new(170.0, 210.0));
        let commit = session.end();

        assert!(!commit.changed);
        assert_eq!(commit.order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_begin_rejects_bad_input() {
        assert!(DragReorderSession::begin(3, 3, Point::default(), grid()).is_none());
        let no_columns = GridGeometry::new(0, 10.0, 10.0);
        assert!(DragReorderSession::begin(3, 0, Point::default(), no_columns).is_none());
    }

    #[test]
    fn test_stale_geometry_is_detected() {
        let session = DragReorderSession::begin(3, 0, Point::default(), grid()).unwrap();
        assert!(!session.is_stale(3));
        assert!(session.is_stale(4));
    }
}
