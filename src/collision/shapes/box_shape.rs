use glam::{Affine3A, Vec3A};

use crate::linear_math::aabb_util_2::{Aabb, transform_aabb};

/// An oriented box centered on its local origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    half_extents: Vec3A,
}

impl BoxShape {
    #[must_use]
    pub const fn new(half_extents: Vec3A) -> Self {
        Self { half_extents }
    }

    #[inline]
    #[must_use]
    pub const fn get_half_extents(&self) -> Vec3A {
        self.half_extents
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.half_extents.is_finite() && self.half_extents.min_element() > 0.0)
    }

    #[must_use]
    pub fn get_aabb(&self, t: &Affine3A) -> Aabb {
        transform_aabb(self.half_extents, 0.0, t)
    }

    #[must_use]
    pub fn local_get_supporting_vertex(&self, vec: Vec3A) -> Vec3A {
        Vec3A::select(
            vec.cmpge(Vec3A::ZERO),
            self.half_extents,
            -self.half_extents,
        )
    }

    /// The 8 corners in local space.
    #[must_use]
    pub fn get_vertices(&self) -> [Vec3A; 8] {
        let h = self.half_extents;
        std::array::from_fn(|i| {
            Vec3A::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
    }
}
