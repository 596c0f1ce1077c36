//! Tests for the engine entry points

use panelmenu_types::SettingValue;

use super::fixtures::{engine_with, inventory, make_app, store_with};
use crate::category::CategoryKind;
use crate::host::StaticInventory;
use crate::settings::{SettingsStore, keys};

#[test]
fn test_new_engine_reflects_stored_preferences() {
    let engine = engine_with(
        store_with(&[
            (keys::MENU_LAYOUT, "eleven".into()),
            (keys::MENU_HEIGHT, SettingValue::Int(700)),
        ]),
        1,
    );
    let surface = &engine.coordinator().surfaces()[0];
    assert_eq!(surface.layout().kind, crate::LayoutKind::Eleven);
    assert_eq!(surface.pinned_columns(), 6);
    assert_eq!(surface.size(), (650.0, 700.0));
    assert_eq!(surface.update_count(crate::UpdateOp::ReloadContent), 0);
}

#[test]
fn test_toggle_pumps_pending_writes_first() {
    let mut engine = engine_with(store_with(&[]), 3);
    engine
        .store_mut()
        .set(keys::MULTI_MONITOR, SettingValue::Bool(true))
        .unwrap();
    engine.window_manager_mut().pointer = Some(2);

    let outcome = engine.toggle().unwrap();
    assert_eq!(engine.coordinator().surfaces().len(), 3);
    assert_eq!(engine.surface(outcome.surface).unwrap().monitor(), Some(2));
}

#[test]
fn test_direct_store_write_waits_for_pump() {
    let mut engine = engine_with(store_with(&[]), 1);
    engine
        .store_mut()
        .set(keys::MENU_HEIGHT, SettingValue::Int(720))
        .unwrap();
    assert_eq!(engine.coordinator().surfaces()[0].size(), (290.0, 550.0));

    assert_eq!(engine.pump(), 1);
    assert_eq!(engine.coordinator().surfaces()[0].size(), (290.0, 720.0));
    assert_eq!(engine.pump(), 0);
}

#[test]
fn test_pump_without_writes_is_a_no_op() {
    let mut engine = engine_with(store_with(&[]), 1);
    assert_eq!(engine.pump(), 0);
}

#[test]
fn test_set_inventory_rebuilds_directories() {
    let mut engine = engine_with(store_with(&[]), 1);
    let mut next = inventory();
    next.apps.push(make_app("steam.desktop", "Steam", &["Game"]));
    engine.set_inventory(Box::new(next));

    let surface = &engine.coordinator().surfaces()[0];
    assert!(
        surface
            .categories()
            .iter()
            .any(|c| c.kind == CategoryKind::Directory("Game".to_string()))
    );
    let id = surface.id();
    let hits = engine.search(id, "steam").unwrap();
    assert_eq!(hits[0].id, "steam.desktop");
}

#[test]
fn test_empty_inventory_leaves_only_extras() {
    let mut engine = engine_with(store_with(&[]), 1);
    engine.set_inventory(Box::new(StaticInventory::default()));

    let kinds: Vec<CategoryKind> = engine.coordinator().surfaces()[0]
        .categories()
        .iter()
        .map(|c| c.kind.clone())
        .collect();
    assert_eq!(kinds, vec![CategoryKind::Pinned, CategoryKind::AllApps]);
}

#[test]
fn test_monitors_changed_adds_surfaces_in_multi_mode() {
    let mut engine = engine_with(store_with(&[(keys::MULTI_MONITOR, true.into())]), 1);
    engine.window_manager_mut().monitors = super::fixtures::FakeWindowManager::with_monitors(2).monitors;
    engine.monitors_changed();

    let monitors: Vec<_> = engine
        .coordinator()
        .surfaces()
        .iter()
        .map(crate::MenuSurface::monitor)
        .collect();
    assert_eq!(monitors, vec![Some(0), Some(1)]);
}

#[test]
fn test_new_surfaces_share_current_preferences() {
    let mut engine = engine_with(store_with(&[(keys::MULTI_MONITOR, true.into())]), 1);
    engine.set_preference(keys::MENU_LAYOUT, "brisk".into()).unwrap();
    engine.window_manager_mut().monitors = super::fixtures::FakeWindowManager::with_monitors(2).monitors;
    engine.monitors_changed();

    for surface in engine.coordinator().surfaces() {
        assert_eq!(surface.layout().kind, crate::LayoutKind::Brisk);
    }
}

#[test]
fn test_layout_switch_takes_new_default_size() {
    let mut engine = engine_with(store_with(&[]), 1);
    engine
        .set_preference(keys::MENU_LAYOUT, "eleven".into())
        .unwrap();

    let fresh = engine_with(store_with(&[(keys::MENU_LAYOUT, "eleven".into())]), 1);
    let switched = &engine.coordinator().surfaces()[0];
    assert_eq!(switched.layout().kind, crate::LayoutKind::Eleven);
    assert_eq!(switched.size(), fresh.coordinator().surfaces()[0].size());
}

#[test]
fn test_layout_switch_keeps_explicit_height() {
    let mut engine = engine_with(store_with(&[(keys::MENU_HEIGHT, SettingValue::Int(700))]), 1);
    engine
        .set_preference(keys::MENU_LAYOUT, "eleven".into())
        .unwrap();

    assert_eq!(engine.coordinator().surfaces()[0].size(), (650.0, 700.0));
}
