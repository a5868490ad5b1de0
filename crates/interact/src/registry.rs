//! Interactive object registry.
//!
//! Tracks which scene nodes are eligible for ray intersection. Membership
//! is unique per node; registering the same node twice is a programming
//! error and is rejected with a distinguishable error. Raycasting reads
//! immutable snapshots, so register/unregister during an in-flight
//! intersection pass can never corrupt it.

use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;
use tracing::debug;
use xrgallery_core::Transform;
use xrgallery_scene::{NodeId, SceneGraph};

/// Errors from registry mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The node is already registered.
    #[error("node {0:?} is already registered")]
    Duplicate(NodeId),
}

/// Stable identity of a registered interactive object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw numeric value, for logging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Pick geometry of an interactive object, in the node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// A quad in the local XY plane, front face toward +Z.
    Quad {
        /// Width along local X.
        width: f32,
        /// Height along local Y.
        height: f32,
    },
    /// An axis-aligned box, used for loaded models.
    Aabb {
        /// Minimum corner.
        min: Vec3,
        /// Maximum corner.
        max: Vec3,
    },
}

/// A scene node eligible for ray intersection, plus free-form metadata.
#[derive(Debug, Clone)]
pub struct InteractiveObject {
    /// The scene node this object tracks.
    pub node: NodeId,
    /// Pick geometry in node-local space.
    pub bounds: Bounds,
    /// Arbitrary key/value metadata (e.g. catalog item title).
    pub metadata: HashMap<String, String>,
}

impl InteractiveObject {
    /// Object for `node` with the given bounds and no metadata.
    pub fn new(node: NodeId, bounds: Bounds) -> Self {
        Self {
            node,
            bounds,
            metadata: HashMap::new(),
        }
    }

    /// Builder: attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

struct Registered {
    id: ObjectId,
    object: InteractiveObject,
}

/// Registry of interactive objects, preserving registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Registered>,
    by_node: HashMap<NodeId, ObjectId>,
    next_id: u64,
}

/// One entry of a registry snapshot: identity, node, resolved world
/// transform and pick bounds, captured at snapshot time.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    /// Object identity.
    pub id: ObjectId,
    /// Backing scene node.
    pub node: NodeId,
    /// World transform of the node at snapshot time.
    pub world: Transform,
    /// Pick geometry in node-local space.
    pub bounds: Bounds,
}

/// Immutable, registration-ordered view of the registry, safe to iterate
/// while the registry itself mutates.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    entries: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    /// Entries in registration order.
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the snapshot holds no objects.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object. Rejects a node that is already registered so
    /// callers can detect double registration.
    pub fn register(&mut self, object: InteractiveObject) -> Result<ObjectId, RegistryError> {
        if self.by_node.contains_key(&object.node) {
            return Err(RegistryError::Duplicate(object.node));
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.by_node.insert(object.node, id);
        debug!(object = id.raw(), node = ?object.node, "registered interactive object");
        self.entries.push(Registered { id, object });
        Ok(id)
    }

    /// Remove an object. No-op when the id is absent.
    pub fn unregister(&mut self, id: ObjectId) {
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            let removed = self.entries.remove(pos);
            self.by_node.remove(&removed.object.node);
            debug!(object = id.raw(), "unregistered interactive object");
        }
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&InteractiveObject> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.object)
    }

    /// The object registered for `node`, if any.
    pub fn id_by_node(&self, node: NodeId) -> Option<ObjectId> {
        self.by_node.get(&node).copied()
    }

    /// Object ids in registration order.
    pub fn list(&self) -> Vec<ObjectId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every registration (session teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_node.clear();
    }

    /// Capture an immutable snapshot with world transforms resolved from
    /// `scene`. Objects whose node has died are skipped rather than
    /// reported; stale registrations are cleaned up by the owner.
    pub fn snapshot(&self, scene: &SceneGraph) -> RegistrySnapshot {
        let entries = self
            .entries
            .iter()
            .filter_map(|e| {
                let world = scene.world_transform(e.object.node)?;
                Some(SnapshotEntry {
                    id: e.id,
                    node: e.object.node,
                    world,
                    bounds: e.object.bounds,
                })
            })
            .collect();
        RegistrySnapshot { entries }
    }
}
