use glam::Vec3;

use terrella_math::Aabb;
use terrella_scene::MeshId;

/// Result of a collision raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The mesh whose bounding box was hit.
    pub mesh: MeshId,
    /// Distance from the ray origin to the entry point, in world units.
    /// Zero when the origin starts inside the box.
    pub distance: f32,
}

/// Slab-method ray/AABB intersection.
///
/// Returns the entry distance along the (normalized) direction, or `None`
/// if the ray misses. An origin inside the box yields distance `0.0`.
pub fn ray_aabb_distance(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<f32> {
    let inv = Vec3::new(
        safe_inv(direction.x),
        safe_inv(direction.y),
        safe_inv(direction.z),
    );

    let t_lo = (aabb.min - origin) * inv;
    let t_hi = (aabb.max - origin) * inv;
    let t1 = t_lo.min(t_hi);
    let t2 = t_lo.max(t_hi);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_far < t_near.max(0.0) {
        return None;
    }
    Some(t_near.max(0.0))
}

/// 1/x clamped away from infinity so that a zero direction component keeps
/// the slab comparisons finite (no `0 * inf` NaN).
fn safe_inv(x: f32) -> f32 {
    if x.abs() < f32::EPSILON {
        f32::MAX
    } else {
        1.0 / x
    }
}
