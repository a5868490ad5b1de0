//! Scene graph adapter for the gallery.
//!
//! A minimal retained scene graph: a generational node arena with strict
//! parent/child tree ownership (destroying a node destroys its subtree),
//! local/world transforms, a look-at helper and per-node materials. The
//! interaction and panel crates mutate this graph as their only observable
//! output; an external renderer is expected to consume it.

mod camera;
mod graph;
mod material;

pub use camera::CameraPose;
pub use graph::{NodeId, SceneError, SceneGraph};
pub use material::{Material, TextureHandle};
