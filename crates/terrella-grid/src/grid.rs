use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use terrella_math::Aabb;
use terrella_scene::{MeshId, MeshSet};

use crate::cell::{cell_coord, pack_cell};

/// Statistics from the most recent grid build.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridStats {
    /// Collidable meshes registered into cells.
    pub meshes_indexed: usize,
    /// Meshes excluded because their AABB exceeded the size threshold.
    pub oversized_skipped: usize,
    /// Cells holding at least one mesh.
    pub occupied_cells: usize,
    /// Mean meshes per occupied cell (0.0 for an empty grid).
    pub avg_meshes_per_cell: f32,
}

/// Uniform spatial hash grid over mesh AABBs.
///
/// Built once from the static scene, optionally in a parent body's local
/// frame; immutable between builds. Queries return the de-duplicated union
/// of meshes in every cell intersecting the query cube. Coverage is
/// conservative, so false positives are possible but false negatives are
/// not.
pub struct SpatialGrid {
    cell_size: f32,
    max_mesh_extent: f32,
    cells: FxHashMap<u64, Vec<MeshId>>,
    /// Resolved build-frame AABB per indexed mesh, so the raycaster tests
    /// exactly what was indexed.
    entries: FxHashMap<MeshId, Aabb>,
    stats: GridStats,
    built: bool,
}

impl SpatialGrid {
    /// Create an empty, unbuilt grid.
    ///
    /// `cell_size` must be positive; values at or below zero are clamped
    /// to a small epsilon rather than faulting later in a divide.
    pub fn new(cell_size: f32, max_mesh_extent: f32) -> Self {
        Self {
            cell_size: cell_size.max(1e-3),
            max_mesh_extent,
            cells: FxHashMap::default(),
            entries: FxHashMap::default(),
            stats: GridStats::default(),
            built: false,
        }
    }

    /// Whether `build` has run since construction.
    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Statistics from the most recent build.
    pub fn stats(&self) -> GridStats {
        self.stats
    }

    /// The build-frame AABB of an indexed mesh, if it was registered.
    pub fn entry_aabb(&self, id: MeshId) -> Option<&Aabb> {
        self.entries.get(&id)
    }

    /// Build the grid from every collidable mesh in the set.
    ///
    /// Clears all previous state. When `world_to_local` is supplied, each
    /// mesh's box is resolved into that frame by transforming all 8 local
    /// corners through the composed `world_to_local * world_transform`
    /// matrix and re-deriving min/max (under rotation the extremal corners
    /// change, so a two-corner transform would under-cover). Composing the
    /// matrices first also keeps the box tight: for meshes authored as
    /// children of the parent body the rotations cancel exactly.
    ///
    /// Meshes whose resolved AABB exceeds `max_mesh_extent` on any axis are
    /// excluded and counted; they would otherwise flood the grid with
    /// cells. An empty mesh set yields an empty grid.
    pub fn build(&mut self, meshes: &MeshSet, world_to_local: Option<&Mat4>) {
        self.cells.clear();
        self.entries.clear();
        self.stats = GridStats::default();

        for id in meshes.collidable_ids() {
            let Some(mesh) = meshes.get(id) else { continue };
            let resolved = match world_to_local {
                Some(m) => mesh.local_aabb.transformed_by(&(*m * mesh.world_transform)),
                None => mesh.world_aabb(),
            };

            if resolved.largest_dimension() > self.max_mesh_extent {
                self.stats.oversized_skipped += 1;
                tracing::warn!(
                    mesh = %mesh.name,
                    extent = resolved.largest_dimension(),
                    limit = self.max_mesh_extent,
                    "mesh too large for spatial grid, excluded"
                );
                continue;
            }

            self.insert_aabb(id, &resolved);
            self.entries.insert(id, resolved);
            self.stats.meshes_indexed += 1;
        }

        self.stats.occupied_cells = self.cells.len();
        let slots: usize = self.cells.values().map(Vec::len).sum();
        self.stats.avg_meshes_per_cell = if self.cells.is_empty() {
            0.0
        } else {
            slots as f32 / self.cells.len() as f32
        };
        self.built = true;

        tracing::debug!(
            meshes = self.stats.meshes_indexed,
            skipped = self.stats.oversized_skipped,
            cells = self.stats.occupied_cells,
            avg_per_cell = self.stats.avg_meshes_per_cell,
            "spatial grid built"
        );
    }

    fn insert_aabb(&mut self, id: MeshId, aabb: &Aabb) {
        let (x0, y0, z0, x1, y1, z1) = self.cell_span(aabb.min, aabb.max);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    self.cells.entry(pack_cell(x, y, z)).or_default().push(id);
                }
            }
        }
    }

    /// Inclusive cell ranges covering the box `[min, max]`.
    fn cell_span(&self, min: Vec3, max: Vec3) -> (i32, i32, i32, i32, i32, i32) {
        (
            cell_coord(min.x, self.cell_size),
            cell_coord(min.y, self.cell_size),
            cell_coord(min.z, self.cell_size),
            cell_coord(max.x, self.cell_size),
            cell_coord(max.y, self.cell_size),
            cell_coord(max.z, self.cell_size),
        )
    }

    /// Collect the de-duplicated mesh ids from every cell intersecting the
    /// cube of side `2 * radius` centered at `point`, into a reused buffer.
    ///
    /// `point` must be expressed in the same frame the grid was built in.
    /// The buffer is cleared first; no allocation occurs once it has grown
    /// to a steady-state capacity.
    pub fn query_into(&self, point: Vec3, radius: f32, out: &mut Vec<MeshId>) {
        out.clear();
        if self.cells.is_empty() {
            return;
        }

        let radius = radius.abs();
        let min = point - Vec3::splat(radius);
        let max = point + Vec3::splat(radius);
        let (x0, y0, z0, x1, y1, z1) = self.cell_span(min, max);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    if let Some(ids) = self.cells.get(&pack_cell(x, y, z)) {
                        out.extend_from_slice(ids);
                    }
                }
            }
        }

        out.sort_unstable();
        out.dedup();
    }

    /// Allocating convenience wrapper around [`SpatialGrid::query_into`].
    pub fn query(&self, point: Vec3, radius: f32) -> Vec<MeshId> {
        let mut out = Vec::new();
        self.query_into(point, radius, &mut out);
        out
    }
}
