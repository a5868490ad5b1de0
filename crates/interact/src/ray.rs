//! Ray construction from gaze and controller poses.

use glam::Vec3;
use xrgallery_core::{Hand, Transform};
use xrgallery_scene::CameraPose;

/// Which source produced a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Cast along the camera's forward axis.
    Gaze,
    /// Cast from the left controller.
    ControllerLeft,
    /// Cast from the right controller.
    ControllerRight,
}

impl From<Hand> for RayKind {
    fn from(hand: Hand) -> Self {
        match hand {
            Hand::Left => RayKind::ControllerLeft,
            Hand::Right => RayKind::ControllerRight,
        }
    }
}

/// An origin plus unit direction, immutable once constructed. Rays are
/// rebuilt per frame/event from the current pose, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// World-space origin.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// Producing source.
    pub kind: RayKind,
}

impl Ray {
    /// Gaze ray: origin at the camera, direction along its forward axis.
    pub fn from_gaze(camera: &CameraPose) -> Self {
        Self {
            origin: camera.position,
            direction: camera.forward(),
            kind: RayKind::Gaze,
        }
    }

    /// Controller ray: origin at the controller, direction is local −Z
    /// rotated by the controller's world rotation only. Translation and
    /// scale never bend the direction.
    pub fn from_controller(hand: Hand, pose: &Transform) -> Self {
        Self {
            origin: pose.position,
            direction: (pose.rotation * Vec3::NEG_Z).normalize(),
            kind: hand.into(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
