//! Drawing surfaces.
//!
//! [`Surface`] is the small slice of a 2D context the renderer needs: clear,
//! a translate+scale transform, image blits into arbitrary rectangles, and
//! line/rectangle strokes and fills. Coordinates and widths passed to the
//! drawing calls are in the space set by the current transform, the same as
//! a browser `CanvasRenderingContext2d`.
//!
//! [`RasterSurface`] is the software implementation backed by an
//! [`image::RgbaImage`]. It never fails, so its error type is
//! [`Infallible`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::convert::Infallible;
use std::ops::Range;

use image::{ImageResult, Rgba, RgbaImage};

use crate::camera::{Point, Rect};

/// A translate+scale affine transform: `device = point * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { scale: 1.0, translate_x: 0.0, translate_y: 0.0 };

    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        Point::new(pt.x * self.scale + self.translate_x, pt.y * self.scale + self.translate_y)
    }

    #[must_use]
    pub fn apply_rect(&self, rect: Rect) -> Rect {
        let origin = self.apply(Point::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.width * self.scale, rect.height * self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The drawing operations the renderer relies on.
pub trait Surface {
    /// Error reported by the underlying host context.
    type Error;

    /// Reset every pixel to the surface background, ignoring the transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Replace the current transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn set_transform(&mut self, transform: Transform) -> Result<(), Self::Error>;

    /// Stretch `image` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) -> Result<(), Self::Error>;

    /// Stroke a straight segment of the given width.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba<u8>) -> Result<(), Self::Error>;

    /// Stroke the outline of `rect`, centered on its edges.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba<u8>) -> Result<(), Self::Error>;

    /// Fill `rect`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host context rejects the call.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) -> Result<(), Self::Error>;
}

/// Software surface over an RGBA pixel buffer.
///
/// Pixels are covered when their center falls inside the shape. Strokes are
/// never thinner than one device pixel. Colors are composited source-over with straight alpha.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    transform: Transform,
    background: Rgba<u8>,
}

impl RasterSurface {
    /// A surface with a transparent background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Rgba([0, 0, 0, 0]))
    }

    /// A surface that clears to `background`.
    #[must_use]
    pub fn with_background(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self { pixels: RgbaImage::from_pixel(width, height, background), transform: Transform::IDENTITY, background }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The current transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Borrow the pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Take the pixel buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Encode the pixel buffer as PNG.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the PNG encoder fails.
    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        crate::export::encode_png(&self.pixels)
    }

    /// Composite `color` over every pixel whose center lies in the device-space box.
    fn fill_device(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
        let xs = pixel_span(x0, x1, self.pixels.width());
        let ys = pixel_span(y0, y1, self.pixels.height());
        for py in ys {
            for px in xs.clone() {
                source_over(self.pixels.get_pixel_mut(px, py), color);
            }
        }
    }

    /// Device-space stroke width for a width given in transformed units.
    fn device_width(&self, width: f64) -> f64 {
        (width * self.transform.scale).max(1.0)
    }
}

impl Surface for RasterSurface {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        let background = self.background;
        for pixel in self.pixels.pixels_mut() {
            *pixel = background;
        }
        Ok(())
    }

    fn set_transform(&mut self, transform: Transform) -> Result<(), Infallible> {
        self.transform = transform;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) -> Result<(), Infallible> {
        let (src_w, src_h) = image.dimensions();
        if src_w == 0 || src_h == 0 {
            return Ok(());
        }
        let d = self.transform.apply_rect(dest);
        if d.width == 0.0 || d.height == 0.0 {
            return Ok(());
        }
        let xs = pixel_span(d.x, d.x + d.width, self.pixels.width());
        let ys = pixel_span(d.y, d.y + d.height, self.pixels.height());
        for py in ys {
            let v = (f64::from(py) + 0.5 - d.y) / d.height;
            let sy = ((v * f64::from(src_h)).floor() as u32).min(src_h - 1);
            for px in xs.clone() {
                let u = (f64::from(px) + 0.5 - d.x) / d.width;
                let sx = ((u * f64::from(src_w)).floor() as u32).min(src_w - 1);
                let src = *image.get_pixel(sx, sy);
                source_over(self.pixels.get_pixel_mut(px, py), src);
            }
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba<u8>) -> Result<(), Infallible> {
        let a = self.transform.apply(from);
        let b = self.transform.apply(to);
        let half = self.device_width(width) / 2.0;

        if a.x == b.x {
            self.fill_device(a.x - half, a.y.min(b.y), a.x + half, a.y.max(b.y), color);
            return Ok(());
        }
        if a.y == b.y {
            self.fill_device(a.x.min(b.x), a.y - half, a.x.max(b.x), a.y + half, color);
            return Ok(());
        }

        // Diagonal: stamp squares one device pixel apart.
        let len = (b.x - a.x).hypot(b.y - a.y);
        let steps = len.ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let t = i / steps;
            let cx = a.x + (b.x - a.x) * t;
            let cy = a.y + (b.y - a.y) * t;
            self.fill_device(cx - half, cy - half, cx + half, cy + half, color);
            i += 1.0;
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba<u8>) -> Result<(), Infallible> {
        let d = self.transform.apply_rect(rect);
        let half = self.device_width(width) / 2.0;
        let (x0, x1) = (d.x.min(d.x + d.width), d.x.max(d.x + d.width));
        let (y0, y1) = (d.y.min(d.y + d.height), d.y.max(d.y + d.height));

        self.fill_device(x0 - half, y0 - half, x1 + half, y0 + half, color);
        self.fill_device(x0 - half, y1 - half, x1 + half, y1 + half, color);
        self.fill_device(x0 - half, y0 + half, x0 + half, y1 - half, color);
        self.fill_device(x1 - half, y0 + half, x1 + half, y1 - half, color);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) -> Result<(), Infallible> {
        let d = self.transform.apply_rect(rect);
        self.fill_device(d.x, d.y, d.x + d.width, d.y + d.height, color);
        Ok(())
    }
}

/// Composite `src` over `dst` with straight (non-premultiplied) alpha.
///
/// An opaque destination stays exactly opaque.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn source_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3];
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let sa = f64::from(sa) / 255.0;
    let da = f64::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().take(3).enumerate() {
        let s = f64::from(src.0[c]) / 255.0;
        let d = f64::from(dst.0[c]) / 255.0;
        *slot = to_u8((s * sa + d * da * (1.0 - sa)) / out_a);
    }
    out[3] = to_u8(out_a);
    *dst = Rgba(out);
}

/// Pixel indices whose centers fall in `[lo, hi)`, clipped to `0..limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(lo: f64, hi: f64, limit: u32) -> Range<u32> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let max = f64::from(limit);
    let start = (lo - 0.5).ceil().clamp(0.0, max) as u32;
    let end = (hi - 0.5).ceil().clamp(0.0, max) as u32;
    start..end.max(start)
}
