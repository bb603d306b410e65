//! Sprite catalog loaded from a directory of image files.
//!
//! Each readable image becomes one asset whose id and display name are the
//! file stem (`oak.png` is `oak`). Files that fail to decode are
//! skipped with a warning so one bad file does not block the whole board.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::catalog::{Catalog, MemoryCatalog};
use canvas::doc::SpriteAsset;
use tracing::{info, warn};

use crate::error::CliError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Load every image directly inside `dir`.
///
/// Entries are visited in path order. When two files share a stem the first
/// one wins and the rest are skipped.
///
/// # Errors
///
/// Returns [`CliError::AssetsDir`] if the directory cannot be listed.
pub fn load_dir(dir: &Path) -> Result<MemoryCatalog, CliError> {
    let read_err = |source: std::io::Error| CliError::AssetsDir { path: dir.to_path_buf(), source };
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_err)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    paths.sort();

    let mut catalog = MemoryCatalog::new();
    for path in paths {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        if catalog.sprite_by_id(&stem).is_some() {
            warn!(path = %path.display(), id = %stem, "duplicate asset id; skipping");
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                catalog.insert(SpriteAsset::new(stem.clone(), stem, img.to_rgba8()));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "unreadable image; skipping"),
        }
    }

    info!(dir = %dir.display(), assets = catalog.len(), "asset catalog loaded");
    Ok(catalog)
}
