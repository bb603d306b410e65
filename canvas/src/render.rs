//! Rendering: draws the full board scene onto a [`Surface`].
//!
//! This module receives read-only views of document, camera, and UI state and
//! produces pixels. It never mutates application state. Every call redraws the
//! whole scene; there is no dirty-rect tracking.
//!
//! Surface errors propagate via `Result<(), S::Error>`; with the raster
//! surface that type is uninhabited.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, Point, Rect};
use crate::consts::{GRID_COLOR, GRID_LINE_WIDTH_PX, HANDLE_FILL, HANDLE_SIZE_PX, SELECTION_COLOR, SELECTION_STROKE_PX};
use crate::doc::{PlacedSprite, SpriteStore};
use crate::input::{GridConfig, UiState};
use crate::surface::Surface;

/// Draw the full scene: grid, sprites, and selection chrome.
///
/// `viewport_w` and `viewport_h` are the surface size in screen pixels.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw<S: Surface>(
    surface: &mut S,
    doc: &SpriteStore,
    camera: &Camera,
    ui: &UiState,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), S::Error> {
    // Layer 1: clear and set up the view transform.
    surface.clear()?;
    surface.set_transform(camera.transform())?;

    // Layer 2: grid.
    if ui.grid.visible {
        draw_grid(surface, &ui.grid, camera.zoom, viewport_w, viewport_h)?;
    }

    // Layer 3: sprites in insertion order (bottom first).
    draw_sprites(surface, doc)?;

    // Layer 4: selection chrome.
    if let Some(sprite) = ui.selected_id.and_then(|id| doc.get(&id)) {
        draw_selection(surface, sprite, camera.zoom)?;
    }

    Ok(())
}

/// Draw every sprite, bottom to top, stretched into its world box.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_sprites<S: Surface>(surface: &mut S, doc: &SpriteStore) -> Result<(), S::Error> {
    for sprite in doc.iter() {
        surface.draw_image(&sprite.asset.image, sprite.bounds())?;
    }
    Ok(())
}

// =============================================================
// Grid
// =============================================================

/// Grid lines at multiples of the cell size, from the world origin out to
/// `viewport / zoom`. Pan is not taken into account.
fn draw_grid<S: Surface>(
    surface: &mut S,
    grid: &GridConfig,
    zoom: f64,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), S::Error> {
    let cell = grid.cell_size;
    let world_w = viewport_w / zoom;
    let world_h = viewport_h / zoom;
    if cell <= 0.0 || !cell.is_finite() || !world_w.is_finite() || !world_h.is_finite() {
        return Ok(());
    }
    let line_w = GRID_LINE_WIDTH_PX / zoom;

    let mut x = 0.0;
    let mut k = 0.0;
    while x <= world_w {
        surface.stroke_line(Point::new(x, 0.0), Point::new(x, world_h), line_w, GRID_COLOR)?;
        k += 1.0;
        x = k * cell;
    }

    let mut y = 0.0;
    let mut k = 0.0;
    while y <= world_h {
        surface.stroke_line(Point::new(0.0, y), Point::new(world_w, y), line_w, GRID_COLOR)?;
        k += 1.0;
        y = k * cell;
    }
    Ok(())
}

// =============================================================
// Selection
// =============================================================

/// Outline plus four corner handles. Widths are divided by `zoom` so they
/// keep a constant on-screen size. Handles are decoration only.
fn draw_selection<S: Surface>(surface: &mut S, sprite: &PlacedSprite, zoom: f64) -> Result<(), S::Error> {
    let bounds = sprite.bounds();
    surface.stroke_rect(bounds, SELECTION_STROKE_PX / zoom, SELECTION_COLOR)?;

    let size = HANDLE_SIZE_PX / zoom;
    for corner in bounds.corners() {
        let handle = Rect::new(corner.x - size / 2.0, corner.y - size / 2.0, size, size);
        surface.fill_rect(handle, HANDLE_FILL)?;
        surface.stroke_rect(handle, 1.0 / zoom, SELECTION_COLOR)?;
    }
    Ok(())
}
