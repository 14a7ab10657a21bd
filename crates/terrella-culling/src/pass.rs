use glam::{Mat4, Vec3};

use terrella_config::QualityTier;
use terrella_math::BoundingSphere;
use terrella_scene::MeshSet;

use crate::frustum::Frustum;

/// Culling cadence per quality tier, in frames.
const TIER_INTERVALS: [u32; 6] = [1, 1, 2, 2, 3, 3];
/// Maximum render distance per quality tier, in world units.
const TIER_MAX_DISTANCE: [f32; 6] = [600.0, 480.0, 360.0, 280.0, 220.0, 160.0];

/// Camera state consumed by the culling pass.
#[derive(Clone, Copy, Debug)]
pub struct CameraView {
    /// Camera position in world space.
    pub position: Vec3,
    /// Projection matrix (0..1 clip depth).
    pub projection: Mat4,
    /// Camera local-to-world transform.
    pub world: Mat4,
}

impl CameraView {
    /// The combined view-projection matrix: projection × inverse world.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.world.inverse()
    }
}

/// Counts from one culling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    pub tested: u32,
    pub culled: u32,
    pub visible: u32,
}

/// Per-frame frustum/distance culling over the scene's cullable meshes.
///
/// Runs on its own per-tier cadence. Distance rejection uses squared
/// distances (no square root per mesh); survivors get a sphere/frustum
/// test, with the sphere expanded by the shadow margin for shadow-casting
/// meshes, since on a curved world a silhouette can fall into view before
/// the mesh itself does.
pub struct CullingPass {
    enabled: bool,
    interval: u32,
    max_distance_sq: f32,
    shadow_margin: f32,
    frame: u32,
}

impl CullingPass {
    /// Pass configured for the given quality tier.
    pub fn for_tier(tier: QualityTier, shadow_margin: f32) -> Self {
        let index = tier.index() as usize;
        let max_distance = TIER_MAX_DISTANCE[index];
        Self {
            enabled: true,
            interval: TIER_INTERVALS[index],
            max_distance_sq: max_distance * max_distance,
            shadow_margin,
            frame: 0,
        }
    }

    /// The configured cadence in frames.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// The configured maximum render distance.
    pub fn max_distance(&self) -> f32 {
        self.max_distance_sq.sqrt()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the pass. Disabling restores every mesh to its
    /// authored render visibility.
    pub fn set_enabled(&mut self, enabled: bool, meshes: &mut MeshSet) {
        if self.enabled && !enabled {
            for mesh in meshes.iter_mut() {
                mesh.visibility.restore_authored();
            }
        }
        self.enabled = enabled;
    }

    /// Run one frame of culling. Returns `None` on frames the cadence
    /// skips (or when disabled); mesh visibility is left as-is on those
    /// frames.
    pub fn run(&mut self, camera: &CameraView, meshes: &mut MeshSet) -> Option<CullStats> {
        if !self.enabled {
            return None;
        }
        let frame = self.frame;
        self.frame = self.frame.wrapping_add(1);
        if frame % self.interval != 0 {
            return None;
        }

        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let mut stats = CullStats::default();

        for mesh in meshes.iter_mut() {
            if mesh.category.always_visible() {
                continue;
            }
            stats.tested += 1;

            let world_aabb = mesh.local_aabb.transformed_by(&mesh.world_transform);
            let mut sphere = BoundingSphere::from_aabb(&world_aabb);
            if mesh.casts_shadow {
                sphere = sphere.expanded(self.shadow_margin);
            }

            let visible = sphere.distance_sq_to(camera.position) <= self.max_distance_sq
                && frustum.intersects_sphere(&sphere);

            // Render channel only; an authored-hidden mesh never pops in.
            mesh.visibility
                .set_render(visible && mesh.visibility.authored_render());
            if visible {
                stats.visible += 1;
            } else {
                stats.culled += 1;
            }
        }

        tracing::trace!(
            tested = stats.tested,
            culled = stats.culled,
            "culling pass"
        );
        Some(stats)
    }
}
