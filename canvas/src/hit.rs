#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{InstanceId, PlacedSprite, SpriteStore};

/// Find the topmost sprite whose closed box contains `world_pt`.
///
/// The store is scanned from the last inserted sprite down, so overlaps
/// resolve to the most recently added one. `z_index` is not consulted.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &SpriteStore) -> Option<&PlacedSprite> {
    doc.iter().rev().find(|sprite| sprite.bounds().contains(world_pt))
}

/// Id of the topmost sprite under `world_pt`, if any.
#[must_use]
pub fn hit_id(world_pt: Point, doc: &SpriteStore) -> Option<InstanceId> {
    hit_test(world_pt, doc).map(|sprite| sprite.id)
}
