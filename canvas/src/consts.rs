//! Shared numeric constants for the canvas crate.

use image::Rgba;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom multiplier applied for one wheel step scrolling down.
pub const ZOOM_OUT_STEP: f64 = 0.9;

/// Zoom multiplier applied for one wheel step scrolling up.
pub const ZOOM_IN_STEP: f64 = 1.1;

// ── Grid ────────────────────────────────────────────────────────

/// Grid cell size in world units.
pub const GRID_CELL_SIZE: f64 = 32.0;

/// Grid line width in screen pixels.
pub const GRID_LINE_WIDTH_PX: f64 = 1.0;

/// Grid line color.
pub const GRID_COLOR: Rgba<u8> = Rgba([0xE2, 0xE2, 0xE2, 0xFF]);

// ── Selection chrome ────────────────────────────────────────────

/// Selection outline width in screen pixels.
pub const SELECTION_STROKE_PX: f64 = 2.0;

/// Side length of a corner handle square in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Selection outline and handle color.
pub const SELECTION_COLOR: Rgba<u8> = Rgba([0x1E, 0x88, 0xE5, 0xFF]);

/// Handle fill color.
pub const HANDLE_FILL: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

// ── Layout ──────────────────────────────────────────────────────

/// Version string written into exported layout documents.
pub const LAYOUT_VERSION: &str = "1.0";
