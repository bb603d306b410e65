//! Asset lookup seam.
//!
//! The engine never loads images itself. Anything that can turn a persisted
//! asset id into a [`SpriteAsset`] implements [`Catalog`]; layout import uses
//! it as the only source of truth for resolving ids.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashMap;
use std::sync::Arc;

use crate::doc::SpriteAsset;

/// Resolves asset ids to loaded sprite assets.
pub trait Catalog {
    /// Look up an asset by id. `None` means the id is unknown.
    fn sprite_by_id(&self, id: &str) -> Option<Arc<SpriteAsset>>;
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    assets: HashMap<String, Arc<SpriteAsset>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, replacing any asset with the same id. Returns the shared handle.
    pub fn insert(&mut self, asset: SpriteAsset) -> Arc<SpriteAsset> {
        let asset = Arc::new(asset);
        self.assets.insert(asset.id.clone(), Arc::clone(&asset));
        asset
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Asset ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Catalog for MemoryCatalog {
    fn sprite_by_id(&self, id: &str) -> Option<Arc<SpriteAsset>> {
        self.assets.get(id).cloned()
    }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn sprite_by_id(&self, id: &str) -> Option<Arc<SpriteAsset>> {
        (**self).sprite_by_id(id)
    }
}
