//! Per-node materials: an optional texture binding plus a flat color.

use xrgallery_core::Rgba;

/// Opaque handle to a texture uploaded to the external renderer.
///
/// The scene graph only tracks identity and dimensions; pixel ownership
/// stays with whoever minted the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub(crate) id: u64,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl TextureHandle {
    /// Numeric identity of this texture.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Surface appearance of a node's quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Bound texture, if any. `None` renders the flat color.
    pub texture: Option<TextureHandle>,
    /// Flat color / tint.
    pub color: Rgba,
    /// Set when the material changed and the renderer must re-evaluate it.
    pub needs_update: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            texture: None,
            color: Rgba::WHITE,
            needs_update: false,
        }
    }
}

impl Material {
    /// Flat-colored material with no texture.
    pub fn flat(color: Rgba) -> Self {
        Self {
            texture: None,
            color,
            needs_update: false,
        }
    }

    /// Textured material tinted white.
    pub fn textured(texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
            color: Rgba::WHITE,
            needs_update: false,
        }
    }
}
