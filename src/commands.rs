//! Subcommand bodies. Each takes the layout text and a loaded catalog and
//! returns what the caller writes out, so none of them touch the filesystem.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use canvas::catalog::Catalog;
use canvas::engine::EngineCore;
use canvas::layout;
use canvas::surface::RasterSurface;
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;

/// What `inspect` reports about a layout file.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub version: String,
    pub records: usize,
    pub resolved: usize,
    pub dropped: usize,
}

/// View settings for `render`.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub grid: bool,
}

fn check_size(width: u32, height: u32) -> Result<(), CliError> {
    if width == 0 || height == 0 {
        return Err(CliError::EmptyOutput { width, height });
    }
    Ok(())
}

fn load(json: &str, catalog: &impl Catalog, width: u32, height: u32) -> Result<EngineCore, CliError> {
    let mut core = EngineCore::new();
    core.set_viewport(f64::from(width), f64::from(height), 1.0);
    let actions = core.import_layout(json, catalog)?;
    debug!(?actions, "layout loaded");
    Ok(core)
}

/// Count records and how many of them resolve against `catalog`.
///
/// # Errors
///
/// Returns [`CliError::Layout`] if the document is malformed.
pub fn inspect(json: &str, catalog: &impl Catalog) -> Result<Summary, CliError> {
    let imported = layout::import(json, catalog)?;
    Ok(Summary {
        version: imported.version,
        records: imported.sprites.len() + imported.dropped,
        resolved: imported.sprites.len(),
        dropped: imported.dropped,
    })
}

/// Flatten the layout into a `width` x `height` PNG at 1:1 scale.
///
/// # Errors
///
/// Returns `Err` for a zero-sized output, a malformed document, or an encoder failure.
pub fn export(json: &str, catalog: &impl Catalog, width: u32, height: u32) -> Result<Vec<u8>, CliError> {
    check_size(width, height)?;
    let core = load(json, catalog, width, height)?;
    Ok(core.export_png()?)
}

/// Draw the layout the way the interactive view shows it, grid included.
///
/// # Errors
///
/// Returns `Err` for a zero-sized output, a malformed document, or an encoder failure.
pub fn render(json: &str, catalog: &impl Catalog, view: ViewOptions) -> Result<Vec<u8>, CliError> {
    check_size(view.width, view.height)?;
    let mut core = load(json, catalog, view.width, view.height)?;
    core.camera.set_zoom(view.zoom);
    core.camera.pan_by(view.pan_x, view.pan_y);
    core.set_grid_visible(view.grid);

    let mut surface = RasterSurface::new(view.width, view.height);
    let Ok(()) = core.render(&mut surface);
    Ok(surface.encode_png()?)
}

/// Import then re-export: unresolved records are dropped, defaults filled in,
/// and the current version written.
///
/// # Errors
///
/// Returns [`CliError::Layout`] if the document is malformed.
pub fn normalize(json: &str, catalog: &impl Catalog) -> Result<String, CliError> {
    let core = load(json, catalog, 1, 1)?;
    Ok(core.export_layout()?)
}
