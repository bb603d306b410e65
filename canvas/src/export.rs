//! Flattened raster export.
//!
//! Export draws only the sprites: no grid and no selection chrome. World
//! coordinates map 1:1 to output pixels, so the live view's pan and zoom are
//! deliberately ignored and the result can differ from what is on screen.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::io::Cursor;

use image::{ImageFormat, ImageResult, RgbaImage};

use crate::doc::SpriteStore;
use crate::render;
use crate::surface::RasterSurface;

/// Flatten the sprites into a transparent `width` x `height` image.
#[must_use]
pub fn rasterize(doc: &SpriteStore, width: u32, height: u32) -> RgbaImage {
    let mut surface = RasterSurface::new(width, height);
    let Ok(()) = render::draw_sprites(&mut surface, doc);
    surface.into_image()
}

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns `Err` if the PNG encoder rejects the image.
pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}
