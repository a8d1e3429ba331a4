use glam::{Affine3A, Vec3A};

use crate::linear_math::aabb_util_2::Aabb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereShape {
    radius: f32,
}

impl SphereShape {
    #[inline]
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    #[inline]
    #[must_use]
    pub const fn get_radius(&self) -> f32 {
        self.radius
    }

    /// A sphere with a non-positive or non-finite radius never reports contacts.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > 0.0)
    }

    #[must_use]
    pub fn get_aabb(&self, t: &Affine3A) -> Aabb {
        let center = t.translation;
        let extent = Vec3A::splat(self.radius);

        Aabb {
            min: center - extent,
            max: center + extent,
        }
    }

    #[must_use]
    pub fn local_get_supporting_vertex(&self, vec: Vec3A) -> Vec3A {
        self.radius * vec.try_normalize().unwrap_or(Vec3A::X)
    }
}
