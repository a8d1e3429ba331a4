use glam::{Affine3A, Vec3A};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3A,
    pub max: Vec3A,
}

impl Aabb {
    #[inline]
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let margin = Vec3A::splat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Touching boxes count as intersecting.
    #[inline]
    #[must_use]
    pub fn intersects(&self, rhs: &Self) -> bool {
        self.min.cmple(rhs.max).all() && self.max.cmpge(rhs.min).all()
    }
}

/// World bounds of a box with `half_extents` placed at `t`.
pub fn transform_aabb(half_extents: Vec3A, margin: f32, t: &Affine3A) -> Aabb {
    let half_extents_with_margin = half_extents + margin;
    let abs_b = t.matrix3.abs();
    let center = t.translation;
    let extent = abs_b * half_extents_with_margin;

    Aabb {
        min: center - extent,
        max: center + extent,
    }
}
