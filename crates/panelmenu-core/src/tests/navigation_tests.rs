//! Tests for the hover corridor

use std::time::Duration;

use panelmenu_types::{Point, Rect};
use proptest::prelude::*;

use crate::category::{CategoryItem, CategoryKind};
use crate::layout::SubmenuSide;
use crate::navigation::{NavigationPredictor, Triangle, area, corridor};
use crate::timer::TimerQueue;

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Orientation-based inside test; `None` when `p` is too close to an edge
/// for either method to be decisive.
fn orientation_inside(t: &Triangle, p: Point) -> Option<bool> {
    let d1 = cross(p, t.a, t.b);
    let d2 = cross(p, t.b, t.c);
    let d3 = cross(p, t.c, t.a);
    if d1.abs() < 1.0 || d2.abs() < 1.0 || d3.abs() < 1.0 {
        return None;
    }
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    Some(!(has_neg && has_pos))
}

fn point() -> impl Strategy<Value = Point> {
    (-500i32..500, -500i32..500).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
}

fn rows(side_offset: f64) -> Vec<CategoryItem> {
    let mut first = CategoryItem::new(CategoryKind::AllApps, Vec::new());
    first.mount(Rect::new(side_offset, 100.0, 200.0, 32.0));
    let mut second = CategoryItem::new(CategoryKind::Frequent, Vec::new());
    second.mount(Rect::new(side_offset, 132.0, 200.0, 32.0));
    vec![first, second]
}

proptest! {
    #[test]
    fn prop_area_sum_matches_orientation_test(a in point(), b in point(), c in point(), p in point()) {
        let t = Triangle::new(a, b, c);
        prop_assume!(t.area() > 10.0);
        if let Some(expected) = orientation_inside(&t, p) {
            prop_assert_eq!(t.contains(p), expected);
        }
    }

    #[test]
    fn prop_vertices_are_inside(a in point(), b in point(), c in point()) {
        let t = Triangle::new(a, b, c);
        prop_assert!(t.contains(a));
        prop_assert!(t.contains(b));
        prop_assert!(t.contains(c));
    }

    #[test]
    fn prop_should_activate_is_outside_corridor(
        ref_x in 0i32..200,
        ref_y in 100i32..132,
        p in point(),
        mirrored in any::<bool>(),
    ) {
        let side = if mirrored { SubmenuSide::Left } else { SubmenuSide::Right };
        let rows = rows(0.0);
        let reference = Point::new(f64::from(ref_x), f64::from(ref_y));

        let mut predictor = NavigationPredictor::new(side, Duration::from_millis(200));
        prop_assert!(predictor.should_activate(&CategoryKind::AllApps, reference, &rows));

        let inside = corridor(reference, rows[0].rect().unwrap(), side).contains(p);
        let activated = predictor.should_activate(&CategoryKind::Frequent, p, &rows);

        prop_assert_eq!(activated, !inside);
        let expected = if inside { CategoryKind::AllApps } else { CategoryKind::Frequent };
        prop_assert_eq!(predictor.navigating(), Some(&expected));
    }
}

#[test]
fn test_area_of_example_triangle() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(100.0, -50.0);
    let c = Point::new(100.0, 50.0);
    assert_eq!(area(a, b, c), 5000.0);
}

#[test]
fn test_example_points_against_triangle() {
    let t = Triangle::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, -50.0),
        Point::new(100.0, 50.0),
    );
    assert!(t.contains(Point::new(50.0, 0.0)));
    assert!(!t.contains(Point::new(150.0, 0.0)));
}

#[test]
fn test_mirrored_layout_corridor_points_left() {
    let rows = rows(300.0);
    let mut predictor = NavigationPredictor::new(SubmenuSide::Left, Duration::from_millis(200));
    predictor.should_activate(&CategoryKind::AllApps, Point::new(400.0, 116.0), &rows);

    // Heading left and down toward the contents pane keeps the row.
    assert!(!predictor.should_activate(&CategoryKind::Frequent, Point::new(320.0, 140.0), &rows));
    // Heading right onto the sibling switches.
    assert!(predictor.should_activate(&CategoryKind::Frequent, Point::new(480.0, 140.0), &rows));
}

#[test]
fn test_corridor_follows_latest_reference() {
    let rows = rows(0.0);
    let mut predictor = NavigationPredictor::default();
    predictor.should_activate(&CategoryKind::AllApps, Point::new(20.0, 116.0), &rows);
    predictor.should_activate(&CategoryKind::AllApps, Point::new(180.0, 116.0), &rows);

    let corridor = predictor.current_corridor(&rows).unwrap();
    assert_eq!(corridor.a, Point::new(180.0, 116.0));
    assert_eq!(corridor.b.x, 220.0);
}

#[test]
fn test_reset_forgets_row_and_cancels_timer() {
    let rows = rows(0.0);
    let mut predictor = NavigationPredictor::default();
    let mut timers = TimerQueue::new();
    predictor.should_activate(&CategoryKind::AllApps, Point::new(20.0, 116.0), &rows);
    predictor.list_left(&mut timers, Duration::ZERO, ());

    predictor.reset(&mut timers);

    assert!(predictor.navigating().is_none());
    assert!(predictor.leave_timer().is_none());
    assert!(timers.is_empty());
}
