use std::{fs, path::Path};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;
use xrgallery_interact::FeedbackPolicy;
use xrgallery_panels::PanelLayout;

const DEFAULT_CONFIG_PATH: &str = "config/gallery.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub interaction: InteractionConfig,
    pub layout: LayoutConfig,
    /// Catalog JSON path. The built-in demo catalog is used when absent.
    pub catalog_path: Option<String>,
    /// Optional model manifest to place alongside the panels.
    pub model_manifest: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Scale factor applied to a selected panel while its pulse is live.
    pub pulse_scale: f32,
    /// Pulse duration in milliseconds before scale reverts.
    pub revert_ms: u64,
    /// Skip quads hit from behind. Panels are double-sided by default.
    pub cull_backfaces: bool,
    /// Maximum ray reach in world units.
    pub max_ray_distance: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub spacing: f32,
    pub panel_height: f32,
    pub panel_depth: f32,
    /// Static look-at target for panel orientation.
    pub anchor: [f32; 3],
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            layout: LayoutConfig::default(),
            catalog_path: None,
            model_manifest: None,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pulse_scale: 1.2,
            revert_ms: 1000,
            cull_backfaces: false,
            max_ray_distance: 1000.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            panel_height: 1.5,
            panel_depth: -3.0,
            anchor: [0.0, 1.5, 0.0],
        }
    }
}

impl GalleryConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<GalleryConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    GalleryConfig::default()
                }
            },
            Err(_) => GalleryConfig::default(),
        }
    }

    pub fn feedback_policy(&self) -> FeedbackPolicy {
        FeedbackPolicy {
            pulse_scale: self.interaction.pulse_scale,
            revert_after: std::time::Duration::from_millis(self.interaction.revert_ms),
        }
    }

    pub fn panel_layout(&self) -> PanelLayout {
        PanelLayout {
            spacing: self.layout.spacing,
            height: self.layout.panel_height,
            depth: self.layout.panel_depth,
            anchor: Vec3::from_array(self.layout.anchor),
            ..PanelLayout::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_interaction_policy() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.interaction.pulse_scale, 1.2);
        assert_eq!(cfg.interaction.revert_ms, 1000);
        assert!(!cfg.interaction.cull_backfaces);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: GalleryConfig = toml::from_str(
            r#"
            [interaction]
            pulse_scale = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.interaction.pulse_scale, 1.5);
        assert_eq!(cfg.interaction.revert_ms, 1000);
        assert_eq!(cfg.layout.spacing, 5.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = GalleryConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(cfg.layout.panel_depth, -3.0);
    }

    #[test]
    fn test_panel_layout_conversion() {
        let mut cfg = GalleryConfig::default();
        cfg.layout.spacing = 7.0;
        cfg.layout.anchor = [1.0, 2.0, 3.0];
        let layout = cfg.panel_layout();
        assert_eq!(layout.spacing, 7.0);
        assert_eq!(layout.anchor, Vec3::new(1.0, 2.0, 3.0));
        // Quad sizes keep their stock values.
        assert_eq!(layout.panel_size, (4.0, 3.0));
    }
}
