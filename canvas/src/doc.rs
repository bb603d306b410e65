//! Document model: sprite assets, placed sprites, and the in-memory store.
//!
//! A [`SpriteAsset`] is owned by the catalog and shared by every placement
//! that uses it. A [`PlacedSprite`] is one tile on the board with its own
//! world-space box. The [`SpriteStore`] keeps placements in insertion order,
//! and that order is the stacking order: the first sprite is drawn at the
//! bottom and the last one is hit first.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::sync::Arc;

use image::RgbaImage;
use uuid::Uuid;

use crate::camera::{Point, Rect};

/// Unique identifier for a placed sprite.
pub type InstanceId = Uuid;

/// An image resource from the catalog. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SpriteAsset {
    /// Catalog id; this is what layout documents persist.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Decoded pixels.
    pub image: RgbaImage,
    /// Width of the source image in pixels.
    pub native_width: u32,
    /// Height of the source image in pixels.
    pub native_height: u32,
}

impl SpriteAsset {
    /// Build an asset from decoded pixels; native size is taken from the image.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: RgbaImage) -> Self {
        let (native_width, native_height) = image.dimensions();
        Self { id: id.into(), name: name.into(), image, native_width, native_height }
    }
}

/// A sprite placed on the board.
#[derive(Debug, Clone)]
pub struct PlacedSprite {
    /// Generated per placement; unique within a store.
    pub id: InstanceId,
    /// The asset this placement draws.
    pub asset: Arc<SpriteAsset>,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// World-space width, independent of the asset's native width.
    pub width: f64,
    /// World-space height, independent of the asset's native height.
    pub height: f64,
    /// Rotation in degrees. Persisted only; not applied when drawing or hit-testing.
    pub rotation: f64,
    /// Persisted stacking hint. Ordering always follows insertion order.
    pub z_index: i64,
}

impl PlacedSprite {
    /// Place `asset` with its top-left at `origin`, at native size, with a fresh id.
    #[must_use]
    pub fn new(asset: Arc<SpriteAsset>, origin: Point) -> Self {
        let width = f64::from(asset.native_width);
        let height = f64::from(asset.native_height);
        Self {
            id: Uuid::new_v4(),
            asset,
            x: origin.x,
            y: origin.y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
        }
    }

    /// World-space top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// World-space bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Ordered store of placed sprites. Index 0 is the bottom of the stack.
#[derive(Debug, Clone, Default)]
pub struct SpriteStore {
    sprites: Vec<PlacedSprite>,
}

impl SpriteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { sprites: Vec::new() }
    }

    /// Append a sprite on top of the stack.
    ///
    /// Returns `false` and leaves the store untouched if a sprite with the
    /// same id is already present.
    pub fn push(&mut self, sprite: PlacedSprite) -> bool {
        if self.contains(&sprite.id) {
            return false;
        }
        self.sprites.push(sprite);
        true
    }

    /// Remove a sprite by id, returning it if it was present. The relative
    /// order of the remaining sprites is preserved.
    pub fn remove(&mut self, id: &InstanceId) -> Option<PlacedSprite> {
        let index = self.sprites.iter().position(|s| &s.id == id)?;
        Some(self.sprites.remove(index))
    }

    /// Return a reference to a sprite by id.
    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&PlacedSprite> {
        self.sprites.iter().find(|s| &s.id == id)
    }

    /// Return a mutable reference to a sprite by id.
    pub fn get_mut(&mut self, id: &InstanceId) -> Option<&mut PlacedSprite> {
        self.sprites.iter_mut().find(|s| &s.id == id)
    }

    /// Whether a sprite with this id is present.
    #[must_use]
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.sprites.iter().any(|s| &s.id == id)
    }

    /// Move a sprite's top-left corner. Returns false if the sprite doesn't exist.
    pub fn move_to(&mut self, id: &InstanceId, origin: Point) -> bool {
        let Some(sprite) = self.get_mut(id) else {
            return false;
        };
        sprite.x = origin.x;
        sprite.y = origin.y;
        true
    }

    /// Replace all sprites at once. Duplicate ids after the first are dropped.
    pub fn replace_all(&mut self, sprites: Vec<PlacedSprite>) {
        self.sprites.clear();
        for sprite in sprites {
            self.push(sprite);
        }
    }

    /// Remove every sprite.
    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    /// Sprites in stacking order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PlacedSprite> {
        self.sprites.iter()
    }

    /// Sprites in stacking order, bottom first.
    #[must_use]
    pub fn as_slice(&self) -> &[PlacedSprite] {
        &self.sprites
    }

    /// Number of sprites currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Returns `true` if the store contains no sprites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
