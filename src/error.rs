use std::path::PathBuf;

use canvas::layout::LayoutError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing asset directory; pass --assets or set SPRITEBOARD_ASSETS")]
    MissingAssets,
    #[error("cannot read asset directory {path}: {source}")]
    AssetsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {path}: {source}")]
    ReadLayout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output size must be at least 1x1, got {width}x{height}")]
    EmptyOutput { width: u32, height: u32 },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
