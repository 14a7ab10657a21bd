//! Character physics for the walkable planet: gravity integration, swept
//! ground collision via downward raycasts, tunneling recovery, and the
//! advisory forward-obstruction query.
//!
//! The engine is the single writer of the character's vertical position and
//! velocity. Collision queries go through a [`CollisionWorld`] view that
//! pulls candidates from the spatial grid (in the rotating planet's local
//! frame) or falls back to scanning the full mesh list when no grid has
//! been built.

mod character;
mod pool;
mod raycast;
mod world;

pub use character::{CharacterController, CharacterState, CharacterTuning};
pub use pool::{QueryScratch, ScratchPool};
pub use raycast::{RayHit, ray_aabb_distance};
pub use world::CollisionWorld;
