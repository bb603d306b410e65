//! Layout documents: exporting the sprite store to versioned JSON and
//! importing it back through a [`Catalog`].
//!
//! Import has two failure tiers. A document whose shape is wrong (not an
//! object, `sprites` missing or not an array, a record with a missing or
//! mistyped field) is rejected as a whole with [`LayoutError::Structural`]
//! and nothing is built. A well-formed record whose `spriteId` the catalog
//! does not know is dropped silently and only counted in [`Imported::dropped`].

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::camera::Point;
use crate::catalog::Catalog;
use crate::consts::LAYOUT_VERSION;
use crate::doc::{PlacedSprite, SpriteStore};

/// Error returned by layout import/export.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The document is not valid JSON or does not have the layout shape.
    #[error("malformed layout document: {0}")]
    Structural(#[source] serde_json::Error),
    /// The layout could not be written as JSON.
    #[error("failed to encode layout document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One persisted placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteRecord {
    /// Catalog asset id.
    pub sprite_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees; `0` when absent.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking hint; the record's array index when absent. Any JSON number
    /// is accepted and rounded to the nearest integer.
    #[serde(default, deserialize_with = "z_index_from_number", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

#[allow(clippy::cast_possible_truncation)]
fn z_index_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    // Float to int `as` saturates at the i64 bounds.
    Ok(Option::<f64>::deserialize(deserializer)?.map(|z| z.round() as i64))
}

/// A complete layout document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Format version. Recorded, never checked against a compatibility table.
    #[serde(default)]
    pub version: String,
    /// Records in stacking order, bottom first.
    pub sprites: Vec<SpriteRecord>,
}

/// Result of resolving a layout document against a catalog.
#[derive(Debug, Clone)]
pub struct Imported {
    /// Newly built placements with fresh ids, in document order.
    pub sprites: Vec<PlacedSprite>,
    /// Records whose asset id the catalog could not resolve.
    pub dropped: usize,
    /// The document's version string as written.
    pub version: String,
}

/// Build a document from the store, in stacking order.
#[must_use]
pub fn to_document(doc: &SpriteStore) -> LayoutDocument {
    let sprites = doc
        .iter()
        .map(|s| SpriteRecord {
            sprite_id: s.asset.id.clone(),
            x: s.x,
            y: s.y,
            width: s.width,
            height: s.height,
            rotation: s.rotation,
            z_index: Some(s.z_index),
        })
        .collect();
    LayoutDocument { version: LAYOUT_VERSION.to_owned(), sprites }
}

/// Serialize the store as a pretty-printed layout document.
///
/// # Errors
///
/// Returns [`LayoutError::Encode`] if JSON serialization fails.
pub fn export_json(doc: &SpriteStore) -> Result<String, LayoutError> {
    serde_json::to_string_pretty(&to_document(doc)).map_err(LayoutError::Encode)
}

/// Parse a layout document without resolving assets.
///
/// # Errors
///
/// Returns [`LayoutError::Structural`] if the text is not a layout document.
pub fn parse(json: &str) -> Result<LayoutDocument, LayoutError> {
    serde_json::from_str(json).map_err(LayoutError::Structural)
}

/// Resolve every record through `catalog`, dropping unknown asset ids.
#[must_use]
pub fn resolve(document: LayoutDocument, catalog: &impl Catalog) -> Imported {
    if document.version != LAYOUT_VERSION {
        debug!(version = %document.version, "layout version differs from current; importing as-is");
    }

    let mut sprites = Vec::with_capacity(document.sprites.len());
    let mut dropped = 0;
    for (index, record) in document.sprites.into_iter().enumerate() {
        let Some(asset) = catalog.sprite_by_id(&record.sprite_id) else {
            debug!(sprite_id = %record.sprite_id, index, "unresolved asset reference; record dropped");
            dropped += 1;
            continue;
        };
        let mut sprite = PlacedSprite::new(asset, Point::new(record.x, record.y));
        sprite.width = record.width;
        sprite.height = record.height;
        sprite.rotation = record.rotation;
        sprite.z_index = record.z_index.unwrap_or_else(|| i64::try_from(index).unwrap_or(i64::MAX));
        sprites.push(sprite);
    }

    debug!(imported = sprites.len(), dropped, "layout resolved");
    Imported { sprites, dropped, version: document.version }
}

/// Parse and resolve in one step. Nothing is built unless the parse succeeds.
///
/// # Errors
///
/// Returns [`LayoutError::Structural`] if the text is not a layout document.
pub fn import(json: &str, catalog: &impl Catalog) -> Result<Imported, LayoutError> {
    let document = parse(json)?;
    Ok(resolve(document, catalog))
}
