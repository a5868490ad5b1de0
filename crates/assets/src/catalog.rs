//! Content catalog: the fixed set of items the gallery displays.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use xrgallery_core::Rgba;

use crate::AssetError;

fn default_fallback_color() -> String {
    // The original gallery degraded failed images to this orange.
    "#ff9900".to_string()
}

/// One catalog entry: a titled, described, optionally-imaged panel.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    /// Title rendered with primary emphasis.
    pub title: String,
    /// Description rendered with secondary emphasis.
    pub description: String,
    /// Image URI. Absent/unresolved images degrade to `fallback_color`.
    #[serde(default)]
    pub image: Option<String>,
    /// Hex color applied when the image is absent or fails to decode.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,
}

impl ContentItem {
    /// The fallback color, parsed. A malformed hex string is reported and
    /// degrades to the stock orange rather than failing the panel.
    pub fn fallback_rgba(&self) -> Rgba {
        match Rgba::from_hex(&self.fallback_color) {
            Ok(color) => color,
            Err(err) => {
                warn!(title = %self.title, %err, "bad fallback color, using default");
                Rgba::FALLBACK_ORANGE
            }
        }
    }
}

/// Parse a JSON catalog string into items.
pub fn catalog_from_str(input: &str) -> Result<Vec<ContentItem>, AssetError> {
    Ok(serde_json::from_str(input)?)
}

/// Load a catalog from a JSON file path.
pub fn catalog_from_file(path: &Path) -> Result<Vec<ContentItem>, AssetError> {
    let data = fs::read_to_string(path)?;
    catalog_from_str(&data)
}

/// The built-in three-item demo catalog, used when no catalog file is
/// supplied.
pub fn default_catalog() -> Vec<ContentItem> {
    vec![
        ContentItem {
            title: "Dreaming Octopus 1".to_string(),
            description: "An octopus that dreams".to_string(),
            image: Some("assets/data_building.jpg".to_string()),
            fallback_color: default_fallback_color(),
        },
        ContentItem {
            title: "Dreaming Octopus 2".to_string(),
            description: "Another octopus that dreams".to_string(),
            image: Some("assets/section_graphic.png".to_string()),
            fallback_color: default_fallback_color(),
        },
        ContentItem {
            title: "Dreaming Octopus 3".to_string(),
            description: "A third octopus that dreams".to_string(),
            image: Some("assets/logo.png".to_string()),
            fallback_color: default_fallback_color(),
        },
    ]
}
