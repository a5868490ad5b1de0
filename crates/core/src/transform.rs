//! World/local transforms shared by the scene graph and interaction code.

use glam::{Mat3, Quat, Vec3};

/// Position, rotation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent space.
    pub position: Vec3,
    /// Orientation in parent space.
    pub rotation: Quat,
    /// Non-uniform scale in parent space.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Transform at `position` with identity rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set a uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Transform positioned at `eye` with its local +Z axis pointing at
    /// `target` (mesh convention: a quad's front face looks at the target).
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position: eye,
            rotation: rotation_facing(target - eye, up),
            scale: Vec3::ONE,
        }
    }

    /// The world-space direction of the local +Z axis (quad front normal).
    pub fn front(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// The world-space direction of the local −Z axis (pointing convention
    /// for cameras and controllers).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Compose `self * child`, mapping `child` from this transform's local
    /// space into its parent space.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale * child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Map a local-space point into parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }
}

/// Rotation whose +Z axis points along `dir` with `up` as the vertical hint.
fn rotation_facing(dir: Vec3, up: Vec3) -> Quat {
    let z = match dir.try_normalize() {
        Some(z) => z,
        None => return Quat::IDENTITY,
    };
    let mut x = up.cross(z);
    if x.length_squared() < 1e-8 {
        // dir is parallel to up; pick an arbitrary horizontal axis.
        x = Vec3::X.cross(z);
        if x.length_squared() < 1e-8 {
            x = Vec3::Y.cross(z);
        }
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}
