use glam::{Mat4, Vec3};

use crate::Aabb;

/// Bounding sphere used by the culling pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere circumscribing the AABB: centered at the box center with
    /// radius equal to the half-diagonal.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            radius: aabb.half_extents().length(),
        }
    }

    /// Returns a sphere with the radius grown by `margin`.
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            center: self.center,
            radius: self.radius + margin,
        }
    }

    /// Transform the sphere center by a matrix.
    ///
    /// The radius is left untouched: frame transforms in this engine are
    /// rigid (rotation + translation, no scale).
    pub fn transformed_by(&self, m: &Mat4) -> Self {
        Self {
            center: m.transform_point3(self.center),
            radius: self.radius,
        }
    }

    /// Squared distance from `point` to the sphere center.
    pub fn distance_sq_to(&self, point: Vec3) -> f32 {
        self.center.distance_squared(point)
    }
}
