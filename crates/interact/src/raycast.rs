//! Nearest-hit raycasting against registry snapshots.

use glam::Vec3;
use xrgallery_core::Transform;

use crate::ray::Ray;
use crate::registry::{Bounds, ObjectId, RegistrySnapshot};

const PARALLEL_EPSILON: f32 = 1e-4;

/// Result of a raycast: the nearest positively-hit object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// The object that was hit.
    pub object: ObjectId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vec3,
}

/// Stateful raycast engine. Holds its configuration and scratch storage so
/// per-frame intersection allocates nothing.
pub struct Raycaster {
    /// Skip quads hit from behind. Panels are visible from either side, so
    /// the default intersects both faces.
    pub cull_backfaces: bool,
    /// Hits farther than this are ignored.
    pub max_distance: f32,
    // Scratch for world-space AABB corners, reused across calls.
    corners: [Vec3; 8],
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            cull_backfaces: false,
            max_distance: 1000.0,
            corners: [Vec3::ZERO; 8],
        }
    }
}

impl Raycaster {
    /// Engine with the default policy (both faces, 1000-unit reach).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set backface culling.
    pub fn with_backface_culling(mut self, cull: bool) -> Self {
        self.cull_backfaces = cull;
        self
    }

    /// Builder: set the maximum hit distance.
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Intersect `ray` against every object in the snapshot and return the
    /// nearest positive-distance hit, or `None`. Ties by distance resolve
    /// to the earliest-registered object. Never fails: an empty snapshot
    /// simply yields `None`.
    pub fn intersect(&mut self, ray: &Ray, snapshot: &RegistrySnapshot) -> Option<HitResult> {
        let mut best: Option<HitResult> = None;
        for entry in snapshot.entries() {
            let hit = match entry.bounds {
                Bounds::Quad { width, height } => {
                    self.intersect_quad(ray, &entry.world, width, height)
                }
                Bounds::Aabb { min, max } => self.intersect_aabb(ray, &entry.world, min, max),
            };
            if let Some(distance) = hit {
                if distance <= 0.0 || distance > self.max_distance {
                    continue;
                }
                // Strict comparison keeps the first-registered object on ties.
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(HitResult {
                        object: entry.id,
                        distance,
                        point: ray.at(distance),
                    });
                }
            }
        }
        best
    }

    /// Ray vs. oriented quad centered on the node, front face along the
    /// node's +Z axis, half extents scaled by the node's world scale.
    fn intersect_quad(
        &self,
        ray: &Ray,
        world: &Transform,
        width: f32,
        height: f32,
    ) -> Option<f32> {
        let normal = world.front();
        let denom = ray.direction.dot(normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        // A ray travelling with the normal strikes the back face.
        if self.cull_backfaces && denom > 0.0 {
            return None;
        }

        let t = (world.position - ray.origin).dot(normal) / denom;
        if t <= 0.0 {
            return None;
        }

        let right = world.rotation * Vec3::X;
        let up = world.rotation * Vec3::Y;
        let half_width = width * 0.5 * world.scale.x;
        let half_height = height * 0.5 * world.scale.y;

        let local = ray.at(t) - world.position;
        let u = local.dot(right);
        let v = local.dot(up);
        if u.abs() <= half_width && v.abs() <= half_height {
            Some(t)
        } else {
            None
        }
    }

    /// Ray vs. AABB via the slab method, against the world-space box that
    /// encloses the transformed local box. Conservative for rotated models
    /// but exact for the axis-aligned common case.
    fn intersect_aabb(&mut self, ray: &Ray, world: &Transform, min: Vec3, max: Vec3) -> Option<f32> {
        self.corners = [
            world.transform_point(Vec3::new(min.x, min.y, min.z)),
            world.transform_point(Vec3::new(max.x, min.y, min.z)),
            world.transform_point(Vec3::new(min.x, max.y, min.z)),
            world.transform_point(Vec3::new(max.x, max.y, min.z)),
            world.transform_point(Vec3::new(min.x, min.y, max.z)),
            world.transform_point(Vec3::new(max.x, min.y, max.z)),
            world.transform_point(Vec3::new(min.x, max.y, max.z)),
            world.transform_point(Vec3::new(max.x, max.y, max.z)),
        ];
        let mut w_min = self.corners[0];
        let mut w_max = self.corners[0];
        for corner in &self.corners[1..] {
            w_min = w_min.min(*corner);
            w_max = w_max.max(*corner);
        }

        let inv = Vec3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );
        let t1 = (w_min.x - ray.origin.x) * inv.x;
        let t2 = (w_max.x - ray.origin.x) * inv.x;
        let t3 = (w_min.y - ray.origin.y) * inv.y;
        let t4 = (w_max.y - ray.origin.y) * inv.y;
        let t5 = (w_min.z - ray.origin.z) * inv.z;
        let t6 = (w_max.z - ray.origin.z) * inv.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Box entirely behind the origin, or no overlap at all.
        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        // Inside the box: the exit point is the first positive crossing.
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}
