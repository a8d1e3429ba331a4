use glam::{Affine3A, Vec3A};

use crate::linear_math::{LARGE_FLOAT, aabb_util_2::Aabb};

/// An infinite plane `normal · x = constant` in the owner's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticPlaneShape {
    plane_normal: Vec3A,
    plane_constant: f32,
    is_single_axis: bool,
    single_axis_idx: usize,
    single_axis_backwards: bool,
}

impl StaticPlaneShape {
    #[must_use]
    pub fn new(plane_normal: Vec3A, plane_constant: f32) -> Self {
        let plane_normal = plane_normal.try_normalize().unwrap_or(Vec3A::Z);
        let [x, y, z]: [bool; 3] = plane_normal.abs().cmpge(Vec3A::splat(f32::EPSILON)).into();

        let (is_single_axis, single_axis_idx, single_axis_backwards) =
            if u8::from(x) + u8::from(y) + u8::from(z) == 1 {
                let axis = plane_normal.abs().max_position();

                (true, axis, plane_normal[axis].is_sign_negative())
            } else {
                (false, 0, false)
            };

        Self {
            plane_normal,
            plane_constant,
            is_single_axis,
            single_axis_idx,
            single_axis_backwards,
        }
    }

    #[must_use]
    pub const fn get_plane_normal(&self) -> Vec3A {
        self.plane_normal
    }

    #[must_use]
    pub const fn get_plane_constant(&self) -> f32 {
        self.plane_constant
    }

    /// Bounds of the solid half-space behind the plane. Only axis-aligned
    /// planes with an untransformed rotation get a finite side.
    #[must_use]
    pub fn get_aabb(&self, t: &Affine3A) -> Aabb {
        let mut min = Vec3A::splat(-LARGE_FLOAT);
        let mut max = Vec3A::splat(LARGE_FLOAT);

        if self.is_single_axis && t.matrix3 == glam::Mat3A::IDENTITY {
            let idx = self.single_axis_idx;
            let surface = t.translation[idx]
                + if self.single_axis_backwards {
                    -self.plane_constant
                } else {
                    self.plane_constant
                };

            if self.single_axis_backwards {
                min[idx] = surface;
            } else {
                max[idx] = surface;
            }
        }

        Aabb { min, max }
    }
}
