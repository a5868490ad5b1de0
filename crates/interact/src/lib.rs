//! Spatial interaction for the gallery.
//!
//! Everything a frame needs to turn a pose into feedback lives here: the
//! interactive object registry, ray construction from gaze/controller
//! sources, nearest-hit raycasting against registry snapshots, and the
//! selection feedback state machine with timed pulse reversion.

pub mod ray;
pub mod raycast;
pub mod registry;
pub mod selection;

pub use ray::{Ray, RayKind};
pub use raycast::{HitResult, Raycaster};
pub use registry::{
    Bounds, InteractiveObject, ObjectId, Registry, RegistryError, RegistrySnapshot,
};
pub use selection::{FeedbackPolicy, ObjectState, SelectionEvent, SelectionFeedback};
