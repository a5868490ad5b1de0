//! Camera pose used to build gaze rays.

use glam::{Quat, Vec3};
use xrgallery_core::Transform;

/// World-space camera pose. The camera looks along its local −Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation in world space.
    pub rotation: Quat,
}

impl CameraPose {
    /// Camera at `eye` looking toward `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        // A camera's −Z points at the target, so orient +Z the other way.
        let t = Transform::looking_at(eye, eye + (eye - target), up);
        Self {
            position: eye,
            rotation: t.rotation,
        }
    }

    /// Pose of a camera carried by a scene node.
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
        }
    }

    /// The direction the camera looks along (−Z rotated into world space),
    /// normalized.
    pub fn forward(&self) -> Vec3 {
        (self.rotation * Vec3::NEG_Z).normalize()
    }
}
