use std::sync::Arc;

use image::{ImageResult, RgbaImage};
use tracing::{debug, info};

use crate::camera::{Camera, Point};
use crate::catalog::Catalog;
use crate::doc::{InstanceId, PlacedSprite, SpriteAsset, SpriteStore};
use crate::hit;
use crate::input::{Button, Cursor, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::layout::{self, LayoutError};
use crate::surface::Surface;
use crate::{export, render};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
///
/// Every mutation that changes what is on screen is followed by its own
/// `RenderNeeded`; hosts redraw once per `RenderNeeded` they receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(Cursor),
    SelectionChanged(Option<InstanceId>),
    HoverChanged(Option<InstanceId>),
    SpriteAdded { id: InstanceId },
    SpriteMoved { id: InstanceId, x: f64, y: f64 },
    SpriteDeleted { id: InstanceId },
    Cleared,
    LayoutImported { imported: usize, dropped: usize },
}

/// Core engine state: the editing session, independent of any host surface.
///
/// Owns the sprite store, the camera, UI state, and the gesture state. All
/// writes to them go through the methods below.
pub struct EngineCore {
    pub doc: SpriteStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: SpriteStore::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport / view ---

    /// Update viewport dimensions (screen pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width;
        self.viewport_height = height;
        self.dpr = dpr;
        vec![Action::RenderNeeded]
    }

    /// Show or hide the grid.
    pub fn toggle_grid(&mut self) -> Vec<Action> {
        self.ui.grid.visible = !self.ui.grid.visible;
        vec![Action::RenderNeeded]
    }

    pub fn set_grid_visible(&mut self, visible: bool) -> Vec<Action> {
        if self.ui.grid.visible == visible {
            return Vec::new();
        }
        self.toggle_grid()
    }

    /// Back to zoom 1 with no pan.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera = Camera::default();
        vec![Action::RenderNeeded]
    }

    // --- Collection mutations ---

    /// Place `asset` at native size with its top-left at `origin` (world
    /// space), on top of the stack, and select it.
    pub fn add_sprite(&mut self, asset: Arc<SpriteAsset>, origin: Point) -> Vec<Action> {
        let mut sprite = PlacedSprite::new(asset, origin);
        sprite.z_index = i64::try_from(self.doc.len()).unwrap_or(i64::MAX);
        let id = sprite.id;
        let asset_id = sprite.asset.id.clone();
        if !self.doc.push(sprite) {
            return Vec::new();
        }
        debug!(%id, asset = %asset_id, x = origin.x, y = origin.y, "sprite added");

        let mut actions = vec![Action::SpriteAdded { id }];
        actions.extend(self.select(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Drop `asset` so that it is centered on a screen point.
    pub fn drop_sprite(&mut self, asset: Arc<SpriteAsset>, screen_pt: Point) -> Vec<Action> {
        let center = self.camera.screen_to_world(screen_pt);
        let origin = Point::new(
            center.x - f64::from(asset.native_width) / 2.0,
            center.y - f64::from(asset.native_height) / 2.0,
        );
        self.add_sprite(asset, origin)
    }

    /// Add `asset` centered in the visible viewport.
    pub fn add_sprite_at_view_center(&mut self, asset: Arc<SpriteAsset>) -> Vec<Action> {
        let center = Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0);
        self.drop_sprite(asset, center)
    }

    /// Remove one sprite. Clears selection, hover, and any drag that refers to it.
    pub fn delete_sprite(&mut self, id: &InstanceId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        debug!(%id, remaining = self.doc.len(), "sprite deleted");

        let mut actions = vec![Action::SpriteDeleted { id: *id }];
        if self.ui.selected_id.as_ref() == Some(id) {
            actions.extend(self.select(None));
        }
        if self.ui.hovered_id.as_ref() == Some(id) {
            self.ui.hovered_id = None;
            actions.push(Action::HoverChanged(None));
        }
        if matches!(self.input, InputState::Dragging { id: dragged, .. } if dragged == *id) {
            self.input = InputState::Idle;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove the selected sprite, if any.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) => self.delete_sprite(&id),
            None => Vec::new(),
        }
    }

    /// Remove every sprite.
    pub fn clear(&mut self) -> Vec<Action> {
        debug!(removed = self.doc.len(), "board cleared");
        self.doc.clear();
        self.input = InputState::Idle;
        self.ui.hovered_id = None;

        let mut actions = vec![Action::Cleared];
        actions.extend(self.select(None));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Layout ---

    /// Serialize the board as a layout document.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Encode`] if JSON serialization fails.
    pub fn export_layout(&self) -> Result<String, LayoutError> {
        layout::export_json(&self.doc)
    }

    /// Replace the board with a layout document.
    ///
    /// On a structural error nothing changes. Otherwise the store is replaced
    /// in one step with the resolved sprites; records with unknown asset ids
    /// are left out.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Structural`] if the document is malformed.
    pub fn import_layout(&mut self, json: &str, catalog: &impl Catalog) -> Result<Vec<Action>, LayoutError> {
        let imported = layout::import(json, catalog)?;
        let count = imported.sprites.len();
        info!(imported = count, dropped = imported.dropped, version = %imported.version, "layout imported");

        self.doc.replace_all(imported.sprites);
        self.input = InputState::Idle;
        self.ui.hovered_id = None;

        let mut actions = vec![Action::LayoutImported { imported: count, dropped: imported.dropped }];
        actions.extend(self.select(None));
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Export / render ---

    /// Flatten the sprites at 1:1 scale into an image the size of the viewport.
    #[must_use]
    pub fn export_image(&self) -> RgbaImage {
        let (width, height) = self.viewport_pixels();
        export::rasterize(&self.doc, width, height)
    }

    /// [`EngineCore::export_image`] encoded as PNG.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the PNG encoder fails.
    pub fn export_png(&self) -> ImageResult<Vec<u8>> {
        export::encode_png(&self.export_image())
    }

    /// Draw the current view onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any surface call fails.
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::draw(surface, &self.doc, &self.camera, &self.ui, self.viewport_width, self.viewport_height)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn viewport_pixels(&self) -> (u32, u32) {
        let w = self.viewport_width.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        let h = self.viewport_height.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        (w, h)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || modifiers.pans() {
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::SetCursor(Cursor::Move)];
        }

        let world_pt = self.camera.screen_to_world(screen_pt);
        match hit::hit_test(world_pt, &self.doc) {
            Some(sprite) => {
                let id = sprite.id;
                let grab_offset = world_pt.minus(sprite.origin());
                self.input = InputState::Dragging { id, grab_offset };
                let mut actions = self.select(Some(id));
                actions.push(Action::SetCursor(Cursor::Grabbing));
                actions.push(Action::RenderNeeded);
                actions
            }
            None => {
                self.input = InputState::Idle;
                let mut actions = self.select(None);
                if !actions.is_empty() {
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id, grab_offset } => {
                let origin = self.camera.screen_to_world(screen_pt).minus(grab_offset);
                if !self.doc.move_to(&id, origin) {
                    self.input = InputState::Idle;
                    return Vec::new();
                }
                vec![Action::SpriteMoved { id, x: origin.x, y: origin.y }, Action::RenderNeeded]
            }
            InputState::Idle => {
                let hovered = hit::hit_id(self.camera.screen_to_world(screen_pt), &self.doc);
                let mut actions = Vec::new();
                if hovered != self.ui.hovered_id {
                    self.ui.hovered_id = hovered;
                    actions.push(Action::HoverChanged(hovered));
                }
                actions.push(Action::SetCursor(if hovered.is_some() { Cursor::Grab } else { Cursor::Default }));
                actions
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.input = InputState::Idle;
        let over_sprite = hit::hit_id(self.camera.screen_to_world(screen_pt), &self.doc).is_some();
        vec![Action::SetCursor(if over_sprite { Cursor::Grab } else { Cursor::Default })]
    }

    /// Zoom one step. Applies in every gesture state; pan is unchanged.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        self.camera.zoom_by_wheel(delta.dy);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_delete() {
            return self.delete_selected();
        }
        if key.is_escape() {
            let mut actions = self.select(None);
            if !actions.is_empty() {
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        Vec::new()
    }

    // --- Queries ---

    /// The currently selected sprite, if any.
    #[must_use]
    pub fn selection(&self) -> Option<InstanceId> {
        self.ui.selected_id
    }

    /// The sprite under the pointer while idle, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<InstanceId> {
        self.ui.hovered_id
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up a sprite by id.
    #[must_use]
    pub fn sprite(&self, id: &InstanceId) -> Option<&PlacedSprite> {
        self.doc.get(id)
    }

    // --- Helpers ---

    /// Set the selection, reporting a change only when it differs.
    fn select(&mut self, id: Option<InstanceId>) -> Vec<Action> {
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id)]
    }
}
