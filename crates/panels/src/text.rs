//! Title/description rasterization onto a fixed-size canvas.

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use tracing::debug;
use xrgallery_core::Rgba;

/// Canvas dimensions for panel text, matching the image quad's 2:1 card.
pub const CANVAS_WIDTH: u32 = 512;
/// See [`CANVAS_WIDTH`].
pub const CANVAS_HEIGHT: u32 = 256;

const TITLE_PX: f32 = 40.0;
const DESCRIPTION_PX: f32 = 30.0;
const TITLE_BASELINE: u32 = 80;
const DESCRIPTION_BASELINE: u32 = 150;
const DESCRIPTION_GRAY: Rgba = Rgba::rgb(77.0 / 255.0, 77.0 / 255.0, 77.0 / 255.0);

/// Try to find a usable system font.
pub fn find_system_font() -> Result<String> {
    let candidates = [
        // Linux
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/google-noto/NotoSans-Regular.ttf",
        // macOS
        "/System/Library/Fonts/Helvetica.ttc",
        "/Library/Fonts/Arial.ttf",
        // Windows
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ];

    for path in candidates {
        if std::path::Path::new(path).exists() {
            return Ok(path.to_string());
        }
    }

    anyhow::bail!("could not find a usable system font")
}

/// A rasterized RGBA8 canvas ready to become a texture.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major, white background.
    pub pixels: Vec<u8>,
}

/// Rasterizes item text with a single loaded font.
pub struct TextRasterizer {
    font: Font,
}

impl TextRasterizer {
    /// Rasterizer backed by the first usable system font.
    pub fn try_system() -> Result<Self> {
        let path = find_system_font()?;
        let bytes = std::fs::read(&path).with_context(|| format!("reading font {path}"))?;
        debug!(%path, "loaded system font for panel text");
        Self::from_bytes(&bytes)
    }

    /// Rasterizer from raw font bytes (TTF/OTF).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|err| anyhow::anyhow!("font parse failed: {err}"))?;
        Ok(Self { font })
    }

    /// Render the title (primary emphasis, black, heavier) and description
    /// (secondary emphasis, gray) centered on a white 512x256 canvas.
    pub fn render_card(&self, title: &str, description: &str) -> TextCanvas {
        let mut canvas = TextCanvas {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            pixels: vec![0xff; (CANVAS_WIDTH * CANVAS_HEIGHT * 4) as usize],
        };
        // Faux-bold: the title is blitted twice, one pixel apart.
        self.draw_centered(&mut canvas, title, TITLE_PX, TITLE_BASELINE, Rgba::BLACK, true);
        self.draw_centered(
            &mut canvas,
            description,
            DESCRIPTION_PX,
            DESCRIPTION_BASELINE,
            DESCRIPTION_GRAY,
            false,
        );
        canvas
    }

    fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px).advance_width)
            .sum()
    }

    fn draw_centered(
        &self,
        canvas: &mut TextCanvas,
        text: &str,
        px: f32,
        baseline: u32,
        color: Rgba,
        bold: bool,
    ) {
        let width = self.measure(text, px);
        let mut cursor = (canvas.width as f32 - width) * 0.5;
        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, px);
            let glyph_x = cursor + metrics.xmin as f32;
            let glyph_top = baseline as i32 - metrics.ymin - metrics.height as i32;
            blit(canvas, &metrics, &coverage, glyph_x as i32, glyph_top, color);
            if bold {
                blit(canvas, &metrics, &coverage, glyph_x as i32 + 1, glyph_top, color);
            }
            cursor += metrics.advance_width;
        }
    }
}

fn blit(
    canvas: &mut TextCanvas,
    metrics: &fontdue::Metrics,
    coverage: &[u8],
    x0: i32,
    y0: i32,
    color: Rgba,
) {
    for row in 0..metrics.height {
        let y = y0 + row as i32;
        if y < 0 || y >= canvas.height as i32 {
            continue;
        }
        for col in 0..metrics.width {
            let x = x0 + col as i32;
            if x < 0 || x >= canvas.width as i32 {
                continue;
            }
            let alpha = coverage[row * metrics.width + col] as f32 / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let offset = ((y as u32 * canvas.width + x as u32) * 4) as usize;
            for (i, component) in [color.r(), color.g(), color.b()].into_iter().enumerate() {
                let bg = canvas.pixels[offset + i] as f32 / 255.0;
                let blended = bg + (component - bg) * alpha;
                canvas.pixels[offset + i] = (blended * 255.0).round() as u8;
            }
        }
    }
}
