//! Tests for a single surface driven through the engine

use std::time::Duration;

use panelmenu_types::{Point, Rect, SettingValue};

use super::fixtures::{TestEngine, engine_with, store_with};
use crate::Error;
use crate::category::CategoryKind;
use crate::layout::ActiveView;
use crate::settings::keys;

/// Single monitor, default layout, rows mounted 32px tall and 200px wide
fn mounted_engine() -> (TestEngine, u32) {
    let mut engine = engine_with(store_with(&[]), 1);
    let id = engine.coordinator().surfaces()[0].id();
    let kinds: Vec<CategoryKind> = engine
        .surface(id)
        .unwrap()
        .categories()
        .iter()
        .map(|c| c.kind.clone())
        .collect();
    for (row, kind) in kinds.iter().enumerate() {
        let y = 100.0 + 32.0 * row as f64;
        assert!(engine.mount_category(id, kind, Rect::new(0.0, y, 200.0, 32.0)).unwrap());
    }
    engine.toggle_surface(id);
    (engine, id)
}

fn view(engine: &TestEngine, id: u32) -> ActiveView {
    engine.surface(id).unwrap().view().clone()
}

#[test]
fn test_default_categories_follow_extras_then_directories() {
    let (engine, id) = mounted_engine();
    let labels: Vec<&str> = engine
        .surface(id)
        .unwrap()
        .categories()
        .iter()
        .map(|c| c.kind.label())
        .collect();
    assert_eq!(labels, vec!["pinned", "all-apps", "Graphics", "Network", "Office"]);
}

#[test]
fn test_open_lands_on_default_view() {
    let (engine, id) = mounted_engine();
    assert!(engine.surface(id).unwrap().is_open());
    assert_eq!(view(&engine, id), ActiveView::Pinned);
}

#[test]
fn test_hover_switches_category() {
    let (mut engine, id) = mounted_engine();
    assert!(engine.hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0)).unwrap());
    assert_eq!(view(&engine, id), ActiveView::Category(CategoryKind::AllApps));
}

#[test]
fn test_hover_inside_corridor_keeps_current_category() {
    let (mut engine, id) = mounted_engine();
    engine
        .hover_category(id, &CategoryKind::Pinned, Point::new(180.0, 116.0))
        .unwrap();

    // Crossing the neighbouring row on the way toward the contents pane.
    assert!(!engine.hover_category(id, &CategoryKind::AllApps, Point::new(200.0, 130.0)).unwrap());
    assert_eq!(view(&engine, id), ActiveView::Category(CategoryKind::Pinned));

    // Moving back into the list proper switches.
    assert!(engine.hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0)).unwrap());
    assert_eq!(view(&engine, id), ActiveView::Category(CategoryKind::AllApps));
}

#[test]
fn test_hover_ignored_while_closed() {
    let (mut engine, id) = mounted_engine();
    engine.toggle_surface(id);
    assert!(!engine.hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0)).unwrap());
}

#[test]
fn test_hover_disabled_by_preference_but_click_still_works() {
    let (mut engine, id) = mounted_engine();
    engine
        .set_preference(keys::ACTIVATE_ON_HOVER, SettingValue::Bool(false))
        .unwrap();

    assert!(!engine.hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0)).unwrap());
    assert!(engine.click_category(id, &CategoryKind::AllApps).unwrap());
    assert_eq!(view(&engine, id), ActiveView::Category(CategoryKind::AllApps));
}

#[test]
fn test_click_unknown_category_is_rejected() {
    let (mut engine, id) = mounted_engine();
    assert!(!engine.click_category(id, &CategoryKind::Recent).unwrap());
    assert_eq!(view(&engine, id), ActiveView::Pinned);
}

#[test]
fn test_leave_timer_forgets_navigating_row() {
    let (mut engine, id) = mounted_engine();
    engine
        .hover_category(id, &CategoryKind::Pinned, Point::new(180.0, 116.0))
        .unwrap();
    engine.leave_category_list(id, Duration::ZERO).unwrap();

    assert_eq!(engine.advance_timers(Duration::from_millis(199)), 0);
    assert!(engine.surface(id).unwrap().predictor().navigating().is_some());

    assert_eq!(engine.advance_timers(Duration::from_millis(200)), 1);
    assert!(engine.surface(id).unwrap().predictor().navigating().is_none());
}

#[test]
fn test_reentering_list_cancels_leave_timer() {
    let (mut engine, id) = mounted_engine();
    engine
        .hover_category(id, &CategoryKind::Pinned, Point::new(180.0, 116.0))
        .unwrap();
    engine.leave_category_list(id, Duration::ZERO).unwrap();
    engine
        .hover_category(id, &CategoryKind::Pinned, Point::new(170.0, 116.0))
        .unwrap();

    assert_eq!(engine.advance_timers(Duration::from_secs(1)), 0);
    assert_eq!(
        engine.surface(id).unwrap().predictor().navigating(),
        Some(&CategoryKind::Pinned)
    );
}

#[test]
fn test_search_switches_view_and_blank_query_returns() {
    let (mut engine, id) = mounted_engine();
    engine
        .hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0))
        .unwrap();

    let hits = engine.search(id, "fire").unwrap();
    assert_eq!(hits[0].id, "firefox.desktop");
    assert_eq!(view(&engine, id), ActiveView::Search);
    assert!(engine.surface(id).unwrap().predictor().navigating().is_none());

    // Hovering does nothing while searching.
    assert!(!engine.hover_category(id, &CategoryKind::AllApps, Point::new(20.0, 140.0)).unwrap());

    assert!(engine.search(id, "   ").unwrap().is_empty());
    assert_eq!(view(&engine, id), ActiveView::Pinned);
}

#[test]
fn test_close_discards_transient_state() {
    let (mut engine, id) = mounted_engine();
    engine.search(id, "calc").unwrap();
    engine.toggle_surface(id);

    let surface = engine.surface(id).unwrap();
    assert!(!surface.is_open());
    assert!(surface.search_results().is_empty());
    assert_eq!(surface.view(), &ActiveView::Pinned);

    engine.toggle_surface(id);
    assert_eq!(view(&engine, id), ActiveView::Pinned);
}

#[test]
fn test_opening_closes_own_context_menu() {
    let (mut engine, id) = mounted_engine();
    engine.toggle_surface(id);
    assert!(engine.open_context_menu(id));
    assert!(engine.surface(id).unwrap().is_context_menu_open());

    engine.toggle_surface(id);
    let surface = engine.surface(id).unwrap();
    assert!(surface.is_open());
    assert!(!surface.is_context_menu_open());
}

#[test]
fn test_extra_categories_rebuild_falls_back_from_missing_view() {
    let (mut engine, id) = mounted_engine();
    engine.click_category(id, &CategoryKind::AllApps).unwrap();
    engine
        .set_preference(
            keys::EXTRA_CATEGORIES,
            SettingValue::StrList(vec!["pinned".to_string(), "!all-apps".to_string()]),
        )
        .unwrap();

    let surface = engine.surface(id).unwrap();
    assert!(!surface.categories().iter().any(|c| c.kind == CategoryKind::AllApps));
    assert_eq!(surface.view(), &ActiveView::Pinned);
    // Rows were rebuilt, so none are mounted yet.
    assert!(surface.categories().iter().all(|c| !c.is_mounted()));
}

#[test]
fn test_runner_opens_on_search() {
    let mut engine = engine_with(
        store_with(&[(keys::ENABLE_STANDALONE_RUNNER, true.into())]),
        1,
    );
    let outcome = engine.toggle_runner().unwrap();
    let runner = engine.surface(outcome.surface).unwrap();
    assert!(runner.is_open());
    assert_eq!(runner.view(), &ActiveView::Search);
    assert_eq!(runner.size(), (500.0, 400.0));
    assert!(runner.status().standalone);
}

#[test]
fn test_unknown_surface_is_an_error() {
    let mut engine = engine_with(store_with(&[]), 1);
    let err = engine.search(999, "calc").unwrap_err();
    assert!(matches!(err, Error::UnknownSurface(999)));
    assert!(engine.drag_begin(999, 0, Point::default()).is_err());
}
