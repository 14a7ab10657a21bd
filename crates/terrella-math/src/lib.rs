//! Math primitives for the Terrella core: f32 bounding volumes and the
//! lazily-inverted parent frame of the rotating planet.

mod aabb;
mod frame;
mod sphere;

pub use aabb::Aabb;
pub use frame::ParentFrame;
pub use sphere::BoundingSphere;
