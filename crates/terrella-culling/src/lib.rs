//! Frustum and distance culling for render visibility.
//!
//! Each eligible frame the pass recomputes the camera frustum and hides
//! cullable meshes that are too far away or outside the view volume. The
//! outcome writes only the render-visibility channel; collision visibility
//! and physics queries are untouched.

mod frustum;
mod pass;

pub use frustum::Frustum;
pub use pass::{CameraView, CullStats, CullingPass};
