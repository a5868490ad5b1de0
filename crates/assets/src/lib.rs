#![warn(missing_docs)]
//! Content catalog schema + asynchronous asset loading.

mod catalog;
mod images;
mod models;

pub use catalog::{catalog_from_file, catalog_from_str, default_catalog, ContentItem};
pub use images::{DecodedImage, ImageLoadResult, ImageLoader, ImageRequest};
pub use models::{load_model_manifest, ModelManifest};

use thiserror::Error;

/// Errors emitted while loading gallery assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading catalog, image or manifest files.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues for JSON assets.
    #[error("failed to parse asset: {0}")]
    Parse(#[from] serde_json::Error),
    /// Wrap image decode failures.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
