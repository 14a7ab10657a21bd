use glam::{Mat4, Vec4};

use terrella_math::BoundingSphere;

/// A view frustum as six inward-pointing planes extracted from the
/// view-projection matrix.
#[derive(Clone, Debug)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far. Each `Vec4(a, b, c, d)` holds
    /// the normalized inward normal `(a,b,c)` and signed distance `d`.
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes via the Gribb–Hartmann method.
    ///
    /// Assumes a 0..1 clip-depth projection (`glam`'s `perspective_rh` /
    /// `orthographic_rh` convention): the near constraint is `z >= 0`
    /// (row 2) and the far constraint `z <= w` (row 3 − row 2).
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        let mut planes = [
            row3 + row0, // left
            row3 - row0, // right
            row3 + row1, // bottom
            row3 - row1, // top
            row2,        // near
            row3 - row2, // far
        ];

        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 1e-8 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Test whether a bounding sphere is at least partially inside.
    ///
    /// Conservative: may report `true` for spheres near frustum corners
    /// that are actually outside, but never reports `false` for a sphere
    /// that intersects the frustum.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        for plane in &self.planes {
            let signed = plane.truncate().dot(sphere.center) + plane.w;
            if signed < -sphere.radius {
                return false;
            }
        }
        true
    }
}
