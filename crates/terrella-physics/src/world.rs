use glam::{Mat4, Vec3};

use terrella_grid::SpatialGrid;
use terrella_scene::{MeshSet, MeshId};

use crate::pool::QueryScratch;
use crate::raycast::{RayHit, ray_aabb_distance};

/// Read-only view of the collidable world for one simulation step.
///
/// Wraps the static mesh set plus, when available, the spatial grid and
/// the world-to-local matrix of the frame the grid was built in. Without a
/// grid, raycasts scan the full unfiltered mesh list: a correctness
/// fallback that trades latency for availability before world load
/// completes.
pub struct CollisionWorld<'a> {
    meshes: &'a MeshSet,
    grid: Option<&'a SpatialGrid>,
    world_to_local: Mat4,
}

impl<'a> CollisionWorld<'a> {
    /// World view without acceleration: every query scans all meshes.
    pub fn unaccelerated(meshes: &'a MeshSet) -> Self {
        Self {
            meshes,
            grid: None,
            world_to_local: Mat4::IDENTITY,
        }
    }

    /// World view backed by a grid built in the frame described by
    /// `world_to_local` (identity for a world-space grid).
    pub fn with_grid(meshes: &'a MeshSet, grid: &'a SpatialGrid, world_to_local: Mat4) -> Self {
        Self {
            meshes,
            grid: grid.is_built().then_some(grid),
            world_to_local,
        }
    }

    pub fn meshes(&self) -> &MeshSet {
        self.meshes
    }

    /// Cast a world-space ray against the collidable meshes and return the
    /// nearest hit within `max_distance`.
    ///
    /// With a grid, the ray is carried into the grid's build frame (rigid
    /// transform, so distances carry back unchanged) and only meshes from
    /// the cells around the ray segment are tested. `scratch` provides the
    /// candidate buffer; the caller owns and recycles it.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        scratch: &mut QueryScratch,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        match self.grid {
            Some(grid) => {
                let local_origin = self.world_to_local.transform_point3(origin);
                let local_dir = self
                    .world_to_local
                    .transform_vector3(direction)
                    .normalize_or_zero();

                // Query cube centered on the ray segment midpoint covers
                // every cell the segment can pass through.
                let mid = local_origin + local_dir * (max_distance * 0.5);
                grid.query_into(mid, max_distance * 0.5 + 1e-3, &mut scratch.candidates);

                let mut nearest: Option<RayHit> = None;
                for &id in &scratch.candidates {
                    if !self.is_hittable(id) {
                        continue;
                    }
                    let Some(aabb) = grid.entry_aabb(id) else {
                        continue;
                    };
                    let Some(distance) = ray_aabb_distance(local_origin, local_dir, aabb) else {
                        continue;
                    };
                    if distance <= max_distance
                        && nearest.is_none_or(|hit| distance < hit.distance)
                    {
                        nearest = Some(RayHit { mesh: id, distance });
                    }
                }
                nearest
            }
            None => {
                tracing::trace!("raycast without grid: full mesh scan");
                let mut nearest: Option<RayHit> = None;
                for mesh in self.meshes.iter().filter(|m| m.is_collidable()) {
                    let aabb = mesh.world_aabb();
                    let Some(distance) = ray_aabb_distance(origin, direction, &aabb) else {
                        continue;
                    };
                    if distance <= max_distance
                        && nearest.is_none_or(|hit| distance < hit.distance)
                    {
                        nearest = Some(RayHit {
                            mesh: mesh.id,
                            distance,
                        });
                    }
                }
                nearest
            }
        }
    }

    fn is_hittable(&self, id: MeshId) -> bool {
        self.meshes.get(id).is_some_and(|m| m.is_collidable())
    }
}
