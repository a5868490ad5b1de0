//! Content panel generation.
//!
//! Turns catalog items into world-placed panels: an image quad oriented at
//! a fixed anchor, with a rasterized title/description quad owned as a
//! child. Image loads are asynchronous with flat-color degradation; text
//! degrades to no text quad when no usable font exists.

mod generator;
mod text;

pub use generator::{apply_image_outcome, PanelAssembly, PanelGenerator, PanelLayout};
pub use text::{find_system_font, TextCanvas, TextRasterizer};
