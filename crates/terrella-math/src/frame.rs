use glam::{Mat4, Quat, Vec3};

/// World transform of a rotating parent body (the planet) with a cached
/// world-to-local inverse.
///
/// The planet spins every frame, so anything stored in its local frame
/// (the spatial grid) needs the current inverse to map world-space queries
/// in. Inverting a `Mat4` per query would be wasteful; instead the inverse
/// is recomputed lazily, at most once per transform change.
///
/// Invariant: after `set_world_transform`, the cached inverse is marked
/// stale and the next `world_to_local` call recomputes it exactly once.
#[derive(Clone, Debug)]
pub struct ParentFrame {
    local_to_world: Mat4,
    world_to_local: Mat4,
    dirty: bool,
}

impl ParentFrame {
    /// Identity frame: local space coincides with world space.
    pub fn identity() -> Self {
        Self {
            local_to_world: Mat4::IDENTITY,
            world_to_local: Mat4::IDENTITY,
            dirty: false,
        }
    }

    /// Frame from a rotation and translation.
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        let mut frame = Self::identity();
        frame.set_world_transform(Mat4::from_rotation_translation(rotation, translation));
        frame
    }

    /// Replace the parent's world transform and mark the inverse stale.
    pub fn set_world_transform(&mut self, local_to_world: Mat4) {
        self.local_to_world = local_to_world;
        self.dirty = true;
    }

    /// The parent's local-to-world transform.
    pub fn local_to_world(&self) -> Mat4 {
        self.local_to_world
    }

    /// The world-to-local transform, recomputing the cached inverse if the
    /// world transform changed since the last call.
    pub fn world_to_local(&mut self) -> Mat4 {
        if self.dirty {
            self.world_to_local = self.local_to_world.inverse();
            self.dirty = false;
        }
        self.world_to_local
    }

    /// True if the cached inverse is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Map a world-space point into the parent's local frame.
    pub fn point_to_local(&mut self, p: Vec3) -> Vec3 {
        self.world_to_local().transform_point3(p)
    }

    /// Map a world-space direction into the parent's local frame.
    ///
    /// The result is re-normalized so callers can treat it as a ray
    /// direction even if the transform carries slight numeric drift.
    pub fn direction_to_local(&mut self, d: Vec3) -> Vec3 {
        self.world_to_local()
            .transform_vector3(d)
            .normalize_or_zero()
    }
}

impl Default for ParentFrame {
    fn default() -> Self {
        Self::identity()
    }
}
