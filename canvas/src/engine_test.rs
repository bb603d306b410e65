#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use std::collections::HashSet;

use image::{ImageFormat, Rgba};

use super::*;
use crate::catalog::MemoryCatalog;

// =============================================================
// Helpers
// =============================================================

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn asset(id: &str, w: u32, h: u32) -> Arc<SpriteAsset> {
    Arc::new(SpriteAsset::new(id, id, RgbaImage::from_pixel(w, h, RED)))
}

fn catalog(ids: &[&str]) -> MemoryCatalog {
    let mut c = MemoryCatalog::new();
    for id in ids {
        c.insert(SpriteAsset::new(*id, *id, RgbaImage::from_pixel(32, 32, RED)));
    }
    c
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn alt_modifier() -> Modifiers {
    Modifiers { alt: true, ..Modifiers::default() }
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn core_with_viewport() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0, 1.0);
    core
}

/// Add a sprite with its top-left at `(x, y)` and return its id.
fn add_at(core: &mut EngineCore, asset_id: &str, x: f64, y: f64, w: u32, h: u32) -> InstanceId {
    let actions = core.add_sprite(asset(asset_id, w, h), pt(x, y));
    let Some(Action::SpriteAdded { id }) = actions.first() else {
        panic!("expected SpriteAdded, got {actions:?}");
    };
    *id
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn cursor_of(actions: &[Action]) -> Option<Cursor> {
    actions.iter().rev().find_map(|a| match a {
        Action::SetCursor(c) => Some(*c),
        _ => None,
    })
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.doc.is_empty());
    assert_eq!(core.selection(), None);
    assert_eq!(core.hovered(), None);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn core_default_camera_is_identity() {
    let cam = EngineCore::new().camera();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn core_default_grid_is_visible() {
    assert!(EngineCore::new().ui.grid.visible);
}

#[test]
fn set_viewport_records_size_and_requests_render() {
    let mut core = EngineCore::new();
    let actions = core.set_viewport(1024.0, 768.0, 2.0);
    assert_eq!(core.viewport_width, 1024.0);
    assert_eq!(core.viewport_height, 768.0);
    assert_eq!(core.dpr, 2.0);
    assert!(has_render_needed(&actions));
}

// =============================================================
// Adding sprites
// =============================================================

#[test]
fn add_sprite_uses_native_size_and_selects_it() {
    let mut core = core_with_viewport();
    let actions = core.add_sprite(asset("tree", 48, 24), pt(10.0, 20.0));
    let Some(Action::SpriteAdded { id }) = actions.first() else {
        panic!("expected SpriteAdded first");
    };
    let sprite = core.sprite(id).unwrap();
    assert_eq!((sprite.x, sprite.y, sprite.width, sprite.height), (10.0, 20.0, 48.0, 24.0));
    assert_eq!(core.selection(), Some(*id));
    assert!(actions.contains(&Action::SelectionChanged(Some(*id))));
    assert!(has_render_needed(&actions));
}

#[test]
fn add_sprite_assigns_increasing_z_index() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 8, 8);
    let b = add_at(&mut core, "tree", 0.0, 0.0, 8, 8);
    assert_eq!(core.sprite(&a).unwrap().z_index, 0);
    assert_eq!(core.sprite(&b).unwrap().z_index, 1);
}

#[test]
fn drop_sprite_centers_on_screen_point() {
    let mut core = core_with_viewport();
    core.camera.zoom = 2.0;
    core.camera.pan_x = 100.0;
    let actions = core.drop_sprite(asset("tree", 40, 20), pt(300.0, 100.0));
    let Some(Action::SpriteAdded { id }) = actions.first() else {
        panic!("expected SpriteAdded");
    };
    // Screen (300, 100) is world (100, 50).
    let sprite = core.sprite(id).unwrap();
    assert_eq!((sprite.x, sprite.y), (80.0, 40.0));
}

#[test]
fn add_sprite_at_view_center_uses_viewport_midpoint() {
    let mut core = core_with_viewport();
    let actions = core.add_sprite_at_view_center(asset("tree", 100, 50));
    let Some(Action::SpriteAdded { id }) = actions.first() else {
        panic!("expected SpriteAdded");
    };
    let sprite = core.sprite(id).unwrap();
    assert_eq!((sprite.x, sprite.y), (350.0, 275.0));
}

#[test]
fn instance_ids_stay_unique_across_adds_and_deletes() {
    let mut core = core_with_viewport();
    let mut seen = HashSet::new();
    for round in 0..50_u32 {
        let id = add_at(&mut core, "tree", f64::from(round), 0.0, 4, 4);
        assert!(seen.insert(id), "duplicate id {id}");
        if round % 3 == 0 {
            core.delete_sprite(&id);
        }
    }
    let live: HashSet<_> = core.doc.iter().map(|s| s.id).collect();
    assert_eq!(live.len(), core.doc.len());
}

// =============================================================
// Deleting
// =============================================================

#[test]
fn delete_key_removes_selected_and_clears_selection() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    let b = add_at(&mut core, "rock", 100.0, 0.0, 32, 32);
    assert_eq!(core.selection(), Some(b));

    let actions = core.on_key_down(key("Delete"), no_modifiers());
    assert!(actions.contains(&Action::SpriteDeleted { id: b }));
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(has_render_needed(&actions));
    assert_eq!(core.selection(), None);
    assert!(core.sprite(&b).is_none());
    assert!(core.sprite(&a).is_some());
}

#[test]
fn backspace_also_deletes() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_key_down(key("Backspace"), no_modifiers());
    assert!(core.doc.is_empty());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_key_down(key("Escape"), no_modifiers());
    let actions = core.on_key_down(key("Delete"), no_modifiers());
    assert!(actions.is_empty());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn other_keys_do_nothing() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    assert!(core.on_key_down(key("a"), no_modifiers()).is_empty());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn delete_unselected_sprite_keeps_selection() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    let b = add_at(&mut core, "rock", 100.0, 0.0, 32, 32);
    let actions = core.delete_sprite(&a);
    assert!(!actions.iter().any(|a| matches!(a, Action::SelectionChanged(_))));
    assert_eq!(core.selection(), Some(b));
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    assert!(core.delete_sprite(&uuid::Uuid::new_v4()).is_empty());
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn deleting_dragged_sprite_ends_drag() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    assert!(matches!(core.input, InputState::Dragging { .. }));
    core.delete_sprite(&a);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn clear_removes_everything() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    add_at(&mut core, "rock", 50.0, 0.0, 32, 32);
    let actions = core.clear();
    assert!(core.doc.is_empty());
    assert_eq!(core.selection(), None);
    assert_eq!(actions.first(), Some(&Action::Cleared));
    assert!(has_render_needed(&actions));
}

// =============================================================
// Pointer: selection and drag
// =============================================================

#[test]
fn pointer_down_on_sprite_selects_and_starts_drag() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_key_down(key("Escape"), no_modifiers());

    let actions = core.on_pointer_down(pt(10.0, 12.0), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), Some(a));
    assert!(actions.contains(&Action::SelectionChanged(Some(a))));
    assert_eq!(cursor_of(&actions), Some(Cursor::Grabbing));
    assert_eq!(core.input, InputState::Dragging { id: a, grab_offset: pt(10.0, 12.0) });
}

#[test]
fn pointer_down_on_empty_space_clears_selection() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    let actions = core.on_pointer_down(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), None);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(has_render_needed(&actions));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn pointer_down_on_empty_space_without_selection_emits_nothing() {
    let mut core = core_with_viewport();
    let actions = core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    assert!(actions.is_empty());
}

#[test]
fn pointer_down_picks_topmost_overlapping_sprite() {
    let mut core = core_with_viewport();
    add_at(&mut core, "a", 0.0, 0.0, 32, 32);
    let b = add_at(&mut core, "b", 16.0, 16.0, 32, 32);
    core.on_key_down(key("Escape"), no_modifiers());
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), Some(b));
}

#[test]
fn drag_keeps_grab_offset() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 100.0, 100.0, 50, 50);
    core.on_pointer_down(pt(110.0, 120.0), Button::Primary, no_modifiers());

    let actions = core.on_pointer_move(pt(210.0, 170.0), no_modifiers());
    assert!(actions.contains(&Action::SpriteMoved { id: a, x: 200.0, y: 150.0 }));
    assert!(has_render_needed(&actions));
    let sprite = core.sprite(&a).unwrap();
    assert_eq!((sprite.x, sprite.y), (200.0, 150.0));
    assert_eq!((sprite.width, sprite.height), (50.0, 50.0));
}

#[test]
fn drag_respects_zoom_and_pan() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 40, 40);
    core.camera.zoom = 2.0;
    core.camera.pan_x = 50.0;
    core.camera.pan_y = 50.0;

    // Screen (70, 70) is world (10, 10): offset (10, 10) into the sprite.
    core.on_pointer_down(pt(70.0, 70.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(90.0, 110.0), no_modifiers());
    let sprite = core.sprite(&a).unwrap();
    assert_eq!((sprite.x, sprite.y), (10.0, 20.0));
}

#[test]
fn pointer_up_ends_drag() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(25.0, 5.0), no_modifiers());
    let actions = core.on_pointer_up(pt(25.0, 5.0), Button::Primary, no_modifiers());
    assert_eq!(core.input, InputState::Idle);
    assert_eq!(cursor_of(&actions), Some(Cursor::Grab));

    // Further moves only hover.
    core.on_pointer_move(pt(400.0, 400.0), no_modifiers());
    assert_eq!(core.sprite(&a).unwrap().x, 20.0);
}

#[test]
fn pointer_up_over_empty_space_restores_default_cursor() {
    let mut core = core_with_viewport();
    core.on_pointer_down(pt(5.0, 5.0), Button::Middle, no_modifiers());
    let actions = core.on_pointer_up(pt(5.0, 5.0), Button::Middle, no_modifiers());
    assert_eq!(cursor_of(&actions), Some(Cursor::Default));
    assert_eq!(core.input, InputState::Idle);
}

// =============================================================
// Pointer: panning
// =============================================================

#[test]
fn middle_button_pans_by_screen_delta() {
    let mut core = core_with_viewport();
    let actions = core.on_pointer_down(pt(100.0, 100.0), Button::Middle, no_modifiers());
    assert_eq!(cursor_of(&actions), Some(Cursor::Move));
    assert!(matches!(core.input, InputState::Panning { .. }));

    core.on_pointer_move(pt(130.0, 90.0), no_modifiers());
    core.on_pointer_move(pt(140.0, 95.0), no_modifiers());
    let cam = core.camera();
    assert_eq!((cam.pan_x, cam.pan_y), (40.0, -5.0));
}

#[test]
fn pan_delta_is_independent_of_zoom() {
    let mut core = core_with_viewport();
    core.camera.zoom = 3.0;
    core.on_pointer_down(pt(0.0, 0.0), Button::Secondary, no_modifiers());
    core.on_pointer_move(pt(15.0, 25.0), no_modifiers());
    assert_eq!((core.camera.pan_x, core.camera.pan_y), (15.0, 25.0));
    assert_eq!(core.camera.zoom, 3.0);
}

#[test]
fn modifier_primary_pans_even_over_sprite() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, alt_modifier());
    assert!(matches!(core.input, InputState::Panning { .. }));

    core.on_pointer_move(pt(20.0, 10.0), no_modifiers());
    assert_eq!(core.camera.pan_x, 10.0);
    assert_eq!(core.sprite(&a).unwrap().x, 0.0);
}

#[test]
fn shift_does_not_pan() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    let shift = Modifiers { shift: true, ..Modifiers::default() };
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, shift);
    assert!(matches!(core.input, InputState::Dragging { id, .. } if id == a));
}

#[test]
fn panning_does_not_change_selection() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(500.0, 500.0), Button::Middle, no_modifiers());
    assert_eq!(core.selection(), Some(a));
}

// =============================================================
// Pointer: hover
// =============================================================

#[test]
fn idle_move_reports_hover_changes() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);

    let actions = core.on_pointer_move(pt(10.0, 10.0), no_modifiers());
    assert!(actions.contains(&Action::HoverChanged(Some(a))));
    assert_eq!(cursor_of(&actions), Some(Cursor::Grab));
    assert_eq!(core.hovered(), Some(a));

    let actions = core.on_pointer_move(pt(12.0, 10.0), no_modifiers());
    assert!(!actions.iter().any(|a| matches!(a, Action::HoverChanged(_))));

    let actions = core.on_pointer_move(pt(300.0, 300.0), no_modifiers());
    assert!(actions.contains(&Action::HoverChanged(None)));
    assert_eq!(cursor_of(&actions), Some(Cursor::Default));
}

#[test]
fn idle_move_does_not_mutate() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_move(pt(10.0, 10.0), no_modifiers());
    assert_eq!(core.sprite(&a).unwrap().x, 0.0);
    assert_eq!(core.camera(), Camera::default());
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_down_zooms_out_and_up_zooms_in() {
    let mut core = core_with_viewport();
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 100.0 }, no_modifiers());
    assert!((core.camera.zoom - 0.9).abs() < 1e-12);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers());
    assert!((core.camera.zoom - 0.99).abs() < 1e-12);
}

#[test]
fn wheel_leaves_pan_alone() {
    let mut core = core_with_viewport();
    core.camera.pan_x = 12.0;
    core.camera.pan_y = -7.0;
    let actions = core.on_wheel(pt(400.0, 300.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    assert!(has_render_needed(&actions));
    assert_eq!((core.camera.pan_x, core.camera.pan_y), (12.0, -7.0));
}

#[test]
fn wheel_zoom_stays_clamped() {
    let mut core = core_with_viewport();
    for _ in 0..200 {
        core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
        assert!(core.camera.zoom <= 5.0);
    }
    assert_eq!(core.camera.zoom, 5.0);
    for _ in 0..200 {
        core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 }, no_modifiers());
        assert!(core.camera.zoom >= 0.1);
    }
    assert_eq!(core.camera.zoom, 0.1);
}

#[test]
fn wheel_during_drag_keeps_dragging() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    core.on_wheel(pt(5.0, 5.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    assert!(matches!(core.input, InputState::Dragging { .. }));
}

// =============================================================
// View controls
// =============================================================

#[test]
fn escape_clears_selection() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    let actions = core.on_key_down(key("Escape"), no_modifiers());
    assert_eq!(core.selection(), None);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn toggle_grid_flips_visibility() {
    let mut core = core_with_viewport();
    assert!(has_render_needed(&core.toggle_grid()));
    assert!(!core.ui.grid.visible);
    core.toggle_grid();
    assert!(core.ui.grid.visible);
}

#[test]
fn set_grid_visible_to_current_value_is_noop() {
    let mut core = core_with_viewport();
    assert!(core.set_grid_visible(true).is_empty());
    assert!(!core.set_grid_visible(false).is_empty());
    assert!(!core.ui.grid.visible);
}

#[test]
fn reset_view_restores_identity_camera() {
    let mut core = core_with_viewport();
    core.camera.zoom = 3.0;
    core.camera.pan_x = 40.0;
    core.reset_view();
    assert_eq!(core.camera(), Camera::default());
}

// =============================================================
// Layout import / export
// =============================================================

#[test]
fn import_replaces_collection_and_clears_selection() {
    let mut core = core_with_viewport();
    add_at(&mut core, "old", 0.0, 0.0, 32, 32);
    let text = r#"{"version":"1.0","sprites":[
        {"spriteId":"tree","x":1,"y":2,"width":3,"height":4,"rotation":0,"zIndex":0},
        {"spriteId":"rock","x":5,"y":6,"width":7,"height":8,"rotation":0,"zIndex":1}
    ]}"#;
    let actions = core.import_layout(text, &catalog(&["tree", "rock"])).unwrap();
    assert_eq!(core.doc.len(), 2);
    assert_eq!(core.selection(), None);
    assert_eq!(actions.first(), Some(&Action::LayoutImported { imported: 2, dropped: 0 }));
    assert!(has_render_needed(&actions));
    let ids: Vec<&str> = core.doc.iter().map(|s| s.asset.id.as_str()).collect();
    assert_eq!(ids, vec!["tree", "rock"]);
}

#[test]
fn import_with_unknown_asset_yields_empty_collection() {
    let mut core = core_with_viewport();
    add_at(&mut core, "old", 0.0, 0.0, 32, 32);
    let text = r#"{"version":"1.0","sprites":[{"spriteId":"ghost","x":0,"y":0,"width":32,"height":32,"rotation":0,"zIndex":0}]}"#;
    let actions = core.import_layout(text, &catalog(&["tree"])).unwrap();
    assert!(core.doc.is_empty());
    assert!(actions.contains(&Action::LayoutImported { imported: 0, dropped: 1 }));
}

#[test]
fn structural_import_error_leaves_board_untouched() {
    let mut core = core_with_viewport();
    let a = add_at(&mut core, "tree", 3.0, 4.0, 32, 32);
    core.camera.zoom = 2.0;

    let result = core.import_layout(r#"{"version":"1.0"}"#, &catalog(&["tree"]));
    assert!(matches!(result, Err(LayoutError::Structural(_))));
    assert_eq!(core.doc.len(), 1);
    assert_eq!(core.sprite(&a).map(|s| (s.x, s.y)), Some((3.0, 4.0)));
    assert_eq!(core.selection(), Some(a));
    assert_eq!(core.camera.zoom, 2.0);
}

#[test]
fn import_resets_gesture_state() {
    let mut core = core_with_viewport();
    add_at(&mut core, "tree", 0.0, 0.0, 32, 32);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    core.import_layout(r#"{"version":"1.0","sprites":[]}"#, &catalog(&[])).unwrap();
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn export_then_import_round_trips() {
    let cat = catalog(&["tree", "rock"]);
    let mut core = core_with_viewport();
    let tree = cat.sprite_by_id("tree").unwrap();
    let rock = cat.sprite_by_id("rock").unwrap();
    core.add_sprite(tree.clone(), pt(0.0, 0.0));
    core.add_sprite(rock, pt(-12.5, 40.25));
    core.add_sprite(tree, pt(300.0, 200.0));
    let before: Vec<_> = core.doc.iter().map(|s| (s.asset.id.clone(), s.x, s.y, s.width, s.height)).collect();

    let text = core.export_layout().unwrap();
    let mut fresh = core_with_viewport();
    fresh.import_layout(&text, &cat).unwrap();
    let after: Vec<_> = fresh.doc.iter().map(|s| (s.asset.id.clone(), s.x, s.y, s.width, s.height)).collect();
    assert_eq!(before, after);
}

// =============================================================
// Raster export
// =============================================================

#[test]
fn export_image_matches_viewport_and_ignores_camera() {
    let mut core = EngineCore::new();
    core.set_viewport(64.0, 48.0, 2.0);
    add_at(&mut core, "tree", 4.0, 4.0, 8, 8);
    core.camera.zoom = 3.0;
    core.camera.pan_x = 20.0;

    let image = core.export_image();
    assert_eq!(image.dimensions(), (64, 48));
    assert_eq!(*image.get_pixel(4, 4), RED);
    assert_eq!(*image.get_pixel(11, 11), RED);
    assert_eq!(image.get_pixel(12, 12).0[3], 0);
    // No grid and no selection chrome.
    assert_eq!(image.get_pixel(0, 0).0[3], 0);
    assert_eq!(image.get_pixel(3, 3).0[3], 0);
}

#[test]
fn export_image_without_viewport_is_one_pixel() {
    assert_eq!(EngineCore::new().export_image().dimensions(), (1, 1));
}

#[test]
fn export_png_decodes() {
    let mut core = EngineCore::new();
    core.set_viewport(16.0, 16.0, 1.0);
    add_at(&mut core, "tree", 0.0, 0.0, 4, 4);
    let bytes = core.export_png().unwrap();
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (16, 16));
    assert_eq!(*decoded.get_pixel(1, 1), RED);
}

// =============================================================
// Render
// =============================================================

#[test]
fn render_draws_view_onto_raster_surface() {
    let mut core = EngineCore::new();
    core.set_viewport(40.0, 40.0, 1.0);
    core.set_grid_visible(false);
    add_at(&mut core, "tree", 10.0, 10.0, 10, 10);
    core.on_key_down(key("Escape"), no_modifiers());
    core.camera.zoom = 2.0;

    let mut surface = crate::surface::RasterSurface::new(40, 40);
    let Ok(()) = core.render(&mut surface);
    assert_eq!(*surface.pixels().get_pixel(25, 25), RED);
    assert_eq!(surface.pixels().get_pixel(15, 15).0[3], 0);
}
