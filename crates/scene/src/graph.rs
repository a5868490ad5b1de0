//! Generational node arena with strict tree ownership.

use glam::Vec3;
use thiserror::Error;
use tracing::debug;
use xrgallery_core::Transform;

use crate::material::{Material, TextureHandle};

/// Errors from scene graph mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced node no longer exists (or never did).
    #[error("node {0:?} is not alive")]
    DeadNode(NodeId),
}

/// Handle to a scene node. Generational: a handle to a removed node stays
/// dead even if the arena slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

struct Node {
    name: String,
    local: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    material: Material,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Retained scene graph. Nodes form a forest; each node has exactly one
/// owner (its parent or the root set) and removal cascades to children.
#[derive(Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    next_texture: u64,
}

impl SceneGraph {
    /// Create an empty scene graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root when `None`).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        local: Transform,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::DeadNode(p));
            }
        }
        let node = Node {
            name: name.into(),
            local,
            parent,
            children: Vec::new(),
            material: Material::default(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        debug!(node = ?id, parent = ?parent, "scene node added");
        Ok(id)
    }

    /// Remove a node and its entire subtree. No-op if the node is already
    /// gone, so teardown paths may call it redundantly.
    pub fn remove_node(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            if self.contains(parent) {
                self.node_mut(parent).children.retain(|c| *c != id);
            }
        } else {
            self.roots.retain(|c| *c != id);
        }
        self.remove_subtree(id);
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.remove_subtree(child);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        self.free.push(id.index);
    }

    /// Whether the node is still alive.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// True when no nodes are alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The node's name, if it is alive.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name.as_str())
    }

    /// Direct children of a node, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The node's local transform.
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.get(id).map(|n| n.local)
    }

    /// Replace the node's local transform.
    pub fn set_local_transform(&mut self, id: NodeId, local: Transform) -> Result<(), SceneError> {
        match self.get_mut(id) {
            Some(node) => {
                node.local = local;
                Ok(())
            }
            None => Err(SceneError::DeadNode(id)),
        }
    }

    /// Set a uniform scale, keeping position and rotation.
    pub fn set_uniform_scale(&mut self, id: NodeId, scale: f32) -> Result<(), SceneError> {
        match self.get_mut(id) {
            Some(node) => {
                node.local.scale = Vec3::splat(scale);
                Ok(())
            }
            None => Err(SceneError::DeadNode(id)),
        }
    }

    /// Orient the node so its world +Z axis points at `target`.
    pub fn look_at(&mut self, id: NodeId, target: Vec3) -> Result<(), SceneError> {
        let world = self.world_transform(id).ok_or(SceneError::DeadNode(id))?;
        // Rotation is written back in local space; panels are roots or sit
        // under identity-rotated parents, so a parent-space write is exact
        // there and a reasonable approximation elsewhere.
        let facing = Transform::looking_at(world.position, target, Vec3::Y);
        let node = self.node_mut(id);
        node.local.rotation = facing.rotation;
        Ok(())
    }

    /// World transform, composed root-down through the parent chain.
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.get(id)?;
        match node.parent {
            Some(parent) => {
                let parent_world = self.world_transform(parent)?;
                Some(parent_world.compose(&node.local))
            }
            None => Some(node.local),
        }
    }

    /// The node's material.
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.get(id).map(|n| &n.material)
    }

    /// Mutable access to the node's material.
    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.get_mut(id).map(|n| &mut n.material)
    }

    /// Mint a handle for a texture of the given dimensions. The pixels are
    /// handed to the external renderer; the graph tracks identity only.
    pub fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle {
        let id = self.next_texture;
        self.next_texture += 1;
        TextureHandle { id, width, height }
    }

    /// Remove every node. Generations advance so handles into the cleared
    /// graph stay dead, and texture identity keeps counting up.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.generation += 1;
            slot.node = None;
            self.free.push(index as u32);
        }
        self.roots.clear();
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn node(&self, id: NodeId) -> &Node {
        self.get(id).expect("checked liveness")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id).expect("checked liveness")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrgallery_core::Rgba;

    #[test]
    fn test_add_and_lookup() {
        let mut scene = SceneGraph::new();
        let id = scene
            .add_node("panel", Transform::from_position(Vec3::X), None)
            .unwrap();
        assert!(scene.contains(id));
        assert_eq!(scene.name(id), Some("panel"));
        assert_eq!(scene.local_transform(id).unwrap().position, Vec3::X);
    }

    #[test]
    fn test_remove_cascades_to_children() {
        let mut scene = SceneGraph::new();
        let panel = scene.add_node("panel", Transform::IDENTITY, None).unwrap();
        let text = scene
            .add_node("text", Transform::IDENTITY, Some(panel))
            .unwrap();
        scene.remove_node(panel);
        assert!(!scene.contains(panel));
        assert!(!scene.contains(text));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_stale_handle_stays_dead_after_slot_reuse() {
        let mut scene = SceneGraph::new();
        let old = scene.add_node("a", Transform::IDENTITY, None).unwrap();
        scene.remove_node(old);
        let new = scene.add_node("b", Transform::IDENTITY, None).unwrap();
        assert!(!scene.contains(old));
        assert!(scene.contains(new));
        assert_ne!(old, new);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut scene = SceneGraph::new();
        let id = scene.add_node("a", Transform::IDENTITY, None).unwrap();
        scene.remove_node(id);
        scene.remove_node(id);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_parent_must_be_alive() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_node("a", Transform::IDENTITY, None).unwrap();
        scene.remove_node(parent);
        let err = scene
            .add_node("b", Transform::IDENTITY, Some(parent))
            .unwrap_err();
        assert_eq!(err, SceneError::DeadNode(parent));
    }

    #[test]
    fn test_world_transform_composes_parent_chain() {
        let mut scene = SceneGraph::new();
        let parent = scene
            .add_node("p", Transform::from_position(Vec3::new(0.0, 1.6, 3.0)), None)
            .unwrap();
        let child = scene
            .add_node(
                "c",
                Transform::from_position(Vec3::new(0.0, 0.0, -2.0)),
                Some(parent),
            )
            .unwrap();
        let world = scene.world_transform(child).unwrap();
        assert_eq!(world.position, Vec3::new(0.0, 1.6, 1.0));
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut scene = SceneGraph::new();
        let id = scene
            .add_node("panel", Transform::from_position(Vec3::new(5.0, 1.5, -3.0)), None)
            .unwrap();
        scene.look_at(id, Vec3::new(0.0, 1.5, 0.0)).unwrap();
        let front = scene.world_transform(id).unwrap().front();
        let expected = (Vec3::new(0.0, 1.5, 0.0) - Vec3::new(5.0, 1.5, -3.0)).normalize();
        assert!((front - expected).length() < 1e-5);
    }

    #[test]
    fn test_material_updates() {
        let mut scene = SceneGraph::new();
        let id = scene.add_node("panel", Transform::IDENTITY, None).unwrap();
        let tex = scene.create_texture(512, 256);
        *scene.material_mut(id).unwrap() = Material::textured(tex);
        assert_eq!(scene.material(id).unwrap().texture, Some(tex));
        scene.material_mut(id).unwrap().texture = None;
        scene.material_mut(id).unwrap().color = Rgba::FALLBACK_ORANGE;
        assert_eq!(scene.material(id).unwrap().color, Rgba::FALLBACK_ORANGE);
    }

    #[test]
    fn test_texture_handles_are_unique() {
        let mut scene = SceneGraph::new();
        let a = scene.create_texture(16, 16);
        let b = scene.create_texture(16, 16);
        assert_ne!(a.id(), b.id());
    }
}
