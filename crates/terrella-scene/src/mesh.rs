use glam::Mat4;

use terrella_math::{Aabb, BoundingSphere};

use crate::Visibility;

/// Stable identifier for a mesh in the scene, assigned at load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Authored category of a scene mesh.
///
/// Categories drive two independent classifications: whether the mesh
/// participates in collision, and whether the culling pass may hide it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshCategory {
    /// Walkable terrain of the planet.
    Ground,
    /// Ocean/lake surfaces.
    Water,
    /// Buildings, bridges, and other solid set pieces.
    Structure,
    /// Small solid props (rocks, fences, furniture).
    Prop,
    /// Trees, grass, flowers.
    Vegetation,
    /// Sun, moon, stars.
    Celestial,
    /// Atmosphere shell around the planet.
    Atmosphere,
    /// Additive glow/halo effects.
    Glow,
    /// Sky dome.
    Sky,
}

impl MeshCategory {
    /// Whether meshes of this category participate in collision.
    ///
    /// Decorative elements (vegetation, celestial bodies, atmosphere, glow,
    /// sky) are excluded: the character walks through grass and can never
    /// stand on the moon's billboard.
    pub fn participates_in_collision(self) -> bool {
        !matches!(
            self,
            Self::Vegetation | Self::Celestial | Self::Atmosphere | Self::Glow | Self::Sky
        )
    }

    /// Whether meshes of this category are exempt from culling.
    ///
    /// On a small curved world the ground, water, atmosphere, sky, and
    /// celestial bodies are effectively always on screen; testing them
    /// every frame is wasted work and hiding them is always wrong.
    pub fn always_visible(self) -> bool {
        matches!(
            self,
            Self::Ground | Self::Water | Self::Atmosphere | Self::Sky | Self::Celestial
        )
    }
}

/// Input descriptor for one mesh, supplied once after scene construction.
#[derive(Clone, Debug)]
pub struct MeshDescriptor {
    pub name: String,
    pub category: MeshCategory,
    /// Bounding box in the mesh's own local space.
    pub local_aabb: Aabb,
    /// Mesh local space to world space.
    pub world_transform: Mat4,
    /// Whether the mesh casts shadows (widens its culling sphere).
    pub casts_shadow: bool,
    /// Authored render visibility.
    pub visible: bool,
}

/// A mesh registered in the scene, with derived collision/visibility state.
#[derive(Clone, Debug)]
pub struct ColliderMesh {
    pub id: MeshId,
    pub name: String,
    pub category: MeshCategory,
    pub local_aabb: Aabb,
    pub world_transform: Mat4,
    pub casts_shadow: bool,
    pub visibility: Visibility,
}

impl ColliderMesh {
    /// World-space AABB, computed on demand from the local box and the
    /// mesh transform (8-corner re-derivation).
    pub fn world_aabb(&self) -> Aabb {
        self.local_aabb.transformed_by(&self.world_transform)
    }

    /// World-space bounding sphere, computed on demand.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_aabb(&self.world_aabb())
    }

    /// True if this mesh can be hit by physics queries right now.
    pub fn is_collidable(&self) -> bool {
        self.category.participates_in_collision() && self.visibility.collision
    }
}

/// The static set of scene meshes, built once after world geometry is
/// finalized. `MeshId` doubles as the index into the backing vector.
#[derive(Debug, Default)]
pub struct MeshSet {
    meshes: Vec<ColliderMesh>,
}

impl MeshSet {
    /// Build the set from descriptors, assigning ids in order.
    pub fn build(descriptors: Vec<MeshDescriptor>) -> Self {
        let meshes = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, d)| {
                let collidable = d.category.participates_in_collision();
                ColliderMesh {
                    id: MeshId(index as u32),
                    name: d.name,
                    category: d.category,
                    local_aabb: d.local_aabb,
                    world_transform: d.world_transform,
                    casts_shadow: d.casts_shadow,
                    visibility: Visibility::new(d.visible, collidable),
                }
            })
            .collect();
        Self { meshes }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn get(&self, id: MeshId) -> Option<&ColliderMesh> {
        self.meshes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut ColliderMesh> {
        self.meshes.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColliderMesh> {
        self.meshes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColliderMesh> {
        self.meshes.iter_mut()
    }

    /// Ids of every mesh that currently participates in collision.
    pub fn collidable_ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes
            .iter()
            .filter(|m| m.is_collidable())
            .map(|m| m.id)
    }

    /// Ids of every mesh the culling pass is allowed to hide.
    pub fn cullable_ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes
            .iter()
            .filter(|m| !m.category.always_visible())
            .map(|m| m.id)
    }
}
