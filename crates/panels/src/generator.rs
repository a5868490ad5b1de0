//! Builds world-placed panels from catalog items.

use anyhow::Result;
use glam::Vec3;
use tracing::{info, warn};
use xrgallery_core::{Rgba, Transform};
use xrgallery_interact::{Bounds, InteractiveObject, ObjectId, Registry};
use xrgallery_scene::{Material, NodeId, SceneGraph};
use xrgallery_assets::{AssetError, ContentItem, DecodedImage, ImageLoader, ImageRequest};

use crate::text::TextRasterizer;

/// Deterministic placement of catalog panels.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout {
    /// Horizontal spacing between adjacent panels.
    pub spacing: f32,
    /// Panel center height.
    pub height: f32,
    /// Panel depth along −Z.
    pub depth: f32,
    /// Static look-at target, fixed at creation time (not the live camera).
    pub anchor: Vec3,
    /// Image quad size (width, height).
    pub panel_size: (f32, f32),
    /// Text quad size (width, height).
    pub text_size: (f32, f32),
    /// Text quad offset in panel-local space; the small +Z keeps the two
    /// quads from fighting visually.
    pub text_offset: Vec3,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            height: 1.5,
            depth: -3.0,
            anchor: Vec3::new(0.0, 1.5, 0.0),
            panel_size: (4.0, 3.0),
            text_size: (3.0, 1.5),
            text_offset: Vec3::new(0.0, -2.0, 0.01),
        }
    }
}

impl PanelLayout {
    /// World position of panel `index` out of `count`, evenly spaced along
    /// X and centered on zero.
    pub fn position_of(&self, index: usize, count: usize) -> Vec3 {
        let centered = index as f32 - (count.saturating_sub(1)) as f32 * 0.5;
        Vec3::new(centered * self.spacing, self.height, self.depth)
    }
}

/// The scene/registry footprint of one generated panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelAssembly {
    /// Base image quad node.
    pub panel: NodeId,
    /// Child text quad node; `None` when rasterization is unavailable.
    pub text: Option<NodeId>,
    /// Registered interactive object.
    pub object: ObjectId,
    /// In-flight image decode, if the item has an image.
    pub image_request: Option<ImageRequest>,
    /// Fallback color to apply on decode failure.
    pub fallback: Rgba,
}

/// Generates panels for catalog items at setup time.
pub struct PanelGenerator {
    layout: PanelLayout,
    rasterizer: Option<TextRasterizer>,
}

impl PanelGenerator {
    /// Generator with the given layout, using the system font when one
    /// exists. Without a font the text layer degrades away; panels are
    /// still produced.
    pub fn new(layout: PanelLayout) -> Self {
        let rasterizer = match TextRasterizer::try_system() {
            Ok(r) => Some(r),
            Err(err) => {
                warn!(%err, "text rasterization unavailable, panels will have no text layer");
                None
            }
        };
        Self { layout, rasterizer }
    }

    /// Generator with an explicit rasterizer (or none), for tests.
    pub fn with_rasterizer(layout: PanelLayout, rasterizer: Option<TextRasterizer>) -> Self {
        Self { layout, rasterizer }
    }

    /// The layout in use.
    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Build the panel for `item`, register it, and kick off its image
    /// load. The text quad is owned by the panel node; destroying the
    /// panel destroys it.
    pub fn build(
        &self,
        item: &ContentItem,
        index: usize,
        count: usize,
        scene: &mut SceneGraph,
        registry: &mut Registry,
        images: &mut ImageLoader,
    ) -> Result<PanelAssembly> {
        let position = self.layout.position_of(index, count);
        let transform = Transform::looking_at(position, self.layout.anchor, Vec3::Y);
        let panel = scene.add_node(format!("panel:{}", item.title), transform, None)?;

        let fallback = item.fallback_rgba();
        let image_request = match item.image.as_deref() {
            Some(uri) => Some(images.request(uri)),
            None => {
                // No image to resolve: degrade to the flat color now.
                *scene
                    .material_mut(panel)
                    .ok_or_else(|| anyhow::anyhow!("panel node vanished during build"))? =
                    Material::flat(fallback);
                None
            }
        };

        let text = match &self.rasterizer {
            Some(rasterizer) => {
                let canvas = rasterizer.render_card(&item.title, &item.description);
                let texture = scene.create_texture(canvas.width, canvas.height);
                let node = scene.add_node(
                    format!("text:{}", item.title),
                    Transform::from_position(self.layout.text_offset),
                    Some(panel),
                )?;
                if let Some(material) = scene.material_mut(node) {
                    *material = Material::textured(texture);
                }
                Some(node)
            }
            None => None,
        };

        let (width, height) = self.layout.panel_size;
        let object = registry.register(
            InteractiveObject::new(panel, Bounds::Quad { width, height })
                .with_metadata("title", &item.title),
        )?;

        info!(
            title = %item.title,
            index,
            x = position.x,
            has_text = text.is_some(),
            "panel created"
        );
        Ok(PanelAssembly {
            panel,
            text,
            object,
            image_request,
            fallback,
        })
    }
}

/// Apply a completed image load to a panel's material. Returns `false`
/// when the panel has been torn down in the meantime, in which case
/// nothing is mutated.
pub fn apply_image_outcome(
    scene: &mut SceneGraph,
    panel: NodeId,
    fallback: Rgba,
    outcome: Result<DecodedImage, AssetError>,
) -> bool {
    // Liveness check: the load may resolve after teardown.
    if !scene.contains(panel) {
        return false;
    }
    match outcome {
        Ok(decoded) => {
            let texture = scene.create_texture(decoded.width, decoded.height);
            if let Some(material) = scene.material_mut(panel) {
                material.texture = Some(texture);
                material.color = Rgba::WHITE;
                material.needs_update = true;
            }
        }
        Err(err) => {
            warn!(%err, "image load failed, applying fallback color");
            if let Some(material) = scene.material_mut(panel) {
                material.texture = None;
                material.color = fallback;
                material.needs_update = true;
            }
        }
    }
    true
}
