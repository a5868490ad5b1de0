//! Model manifests.
//!
//! Real mesh formats stay outside this crate; a manifest names a model and
//! its pick bounds so the session can place and register it. Load failures
//! are reported to the caller and leave the interactive set unaffected.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::AssetError;

/// Placement and pick bounds for an externally rendered model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    /// Display name for the model's scene node.
    pub name: String,
    /// Minimum corner of the local-space pick box.
    pub min: [f32; 3],
    /// Maximum corner of the local-space pick box.
    pub max: [f32; 3],
    /// World position to place the model at.
    #[serde(default)]
    pub position: [f32; 3],
}

impl ModelManifest {
    /// Minimum corner as a vector.
    pub fn min_vec(&self) -> Vec3 {
        Vec3::from_array(self.min)
    }

    /// Maximum corner as a vector.
    pub fn max_vec(&self) -> Vec3 {
        Vec3::from_array(self.max)
    }

    /// Placement position as a vector.
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Load a model manifest from a JSON file.
pub fn load_model_manifest(path: &Path) -> Result<ModelManifest, AssetError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest: ModelManifest = serde_json::from_str(
            r#"{"name": "camping", "min": [-1, 0, -1], "max": [1, 2, 1], "position": [0, 1, -1]}"#,
        )
        .unwrap();
        assert_eq!(manifest.name, "camping");
        assert_eq!(manifest.min_vec(), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(manifest.position_vec(), Vec3::new(0.0, 1.0, -1.0));
    }

    #[test]
    fn test_position_defaults_to_origin() {
        let manifest: ModelManifest =
            serde_json::from_str(r#"{"name": "m", "min": [0, 0, 0], "max": [1, 1, 1]}"#).unwrap();
        assert_eq!(manifest.position_vec(), Vec3::ZERO);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_model_manifest(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }
}
