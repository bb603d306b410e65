//! Browser host: draws the engine onto an HTML `<canvas>`.
//!
//! This module is the only place that touches [`web_sys`]. All fallible
//! `Canvas2D` calls propagate errors via `Result<_, JsValue>`.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::camera::{Point, Rect};
use crate::catalog::Catalog;
use crate::doc::{InstanceId, SpriteAsset};
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Cursor, Key, Modifiers, WheelDelta};
use crate::layout::LayoutError;
use crate::surface::{Surface, Transform};

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn css_color(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("rgba({r},{g},{b},{})", f64::from(a) / 255.0)
}

/// [`Surface`] over a `CanvasRenderingContext2d`.
///
/// Transforms are given in CSS pixels and scaled by the device pixel ratio.
pub struct WebSurface {
    ctx: CanvasRenderingContext2d,
    scratch: HtmlCanvasElement,
    scratch_ctx: CanvasRenderingContext2d,
    width_css: f64,
    height_css: f64,
    dpr: f64,
}

impl WebSurface {
    /// Bind to `canvas`, creating an offscreen canvas for image uploads.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either 2D context cannot be obtained.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(canvas)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let scratch = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from)?;
        let scratch_ctx = context_2d(&scratch)?;
        Ok(Self {
            ctx,
            scratch,
            scratch_ctx,
            width_css: f64::from(canvas.width()),
            height_css: f64::from(canvas.height()),
            dpr: 1.0,
        })
    }

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.width_css = width_css;
        self.height_css = height_css;
        self.dpr = dpr;
    }
}

impl Surface for WebSurface {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, self.width_css, self.height_css);
        Ok(())
    }

    fn set_transform(&mut self, t: Transform) -> Result<(), JsValue> {
        let s = t.scale * self.dpr;
        self.ctx.set_transform(s, 0.0, 0.0, s, t.translate_x * self.dpr, t.translate_y * self.dpr)
    }

    /// Uploads the pixels through the scratch canvas on every call.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) -> Result<(), JsValue> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.scratch.set_width(w);
        self.scratch.set_height(h);
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(image.as_raw()), w, h)?;
        self.scratch_ctx.put_image_data(&data, 0.0, 0.0)?;
        self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(&self.scratch, dest.x, dest.y, dest.width, dest.height)
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba<u8>) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba<u8>) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
///
/// Every delegated call processes the returned actions: cursor changes are
/// applied to the element and the scene is redrawn once if any action asked
/// for it. The actions are then handed back to the caller.
pub struct Engine {
    canvas: HtmlCanvasElement,
    surface: WebSurface,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let surface = WebSurface::new(&canvas)?;
        Ok(Self { canvas, surface, core: EngineCore::new() })
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, resizing the backing store.
    ///
    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Result<Vec<Action>, JsValue> {
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
        self.surface.set_viewport(width_css, height_css, dpr);
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        self.process(actions)
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_move(screen_pt, modifiers);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_up(screen_pt, button, modifiers);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_wheel(screen_pt, delta, modifiers);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_key_down(key, modifiers);
        self.process(actions)
    }

    // --- Sprites ---

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn drop_sprite(&mut self, asset: Arc<SpriteAsset>, screen_pt: Point) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.drop_sprite(asset, screen_pt);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn add_sprite_at_view_center(&mut self, asset: Arc<SpriteAsset>) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.add_sprite_at_view_center(asset);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn delete_sprite(&mut self, id: &InstanceId) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.delete_sprite(id);
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn clear(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.clear();
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn toggle_grid(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.toggle_grid();
        self.process(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if redrawing fails.
    pub fn reset_view(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.reset_view();
        self.process(actions)
    }

    // --- Layout ---

    /// # Errors
    ///
    /// Returns `Err` if the layout cannot be encoded.
    pub fn export_layout(&self) -> Result<String, JsValue> {
        self.core.export_layout().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the board with a layout document. A malformed document leaves
    /// the board as it was.
    ///
    /// # Errors
    ///
    /// Returns `Err` with the layout error message, or if redrawing fails.
    pub fn import_layout(&mut self, json: &str, catalog: &impl Catalog) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.import_layout(json, catalog).map_err(|e: LayoutError| JsValue::from_str(&e.to_string()))?;
        self.process(actions)
    }

    /// Flatten the board into PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if PNG encoding fails.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.core.export_png().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.core.render(&mut self.surface)
    }

    fn apply_cursor(&self, cursor: Cursor) -> Result<(), JsValue> {
        self.canvas.style().set_property("cursor", cursor.as_css())
    }

    fn process(&mut self, actions: Vec<Action>) -> Result<Vec<Action>, JsValue> {
        let mut redraw = false;
        for action in &actions {
            match action {
                Action::SetCursor(cursor) => self.apply_cursor(*cursor)?,
                Action::RenderNeeded => redraw = true,
                _ => {}
            }
        }
        if redraw {
            self.render()?;
        }
        Ok(actions)
    }
}
