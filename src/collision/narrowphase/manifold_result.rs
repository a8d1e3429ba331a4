use glam::{Affine3A, Vec3A};

use super::{manifold_point::ManifoldPoint, persistent_manifold::PersistentManifold};
use crate::linear_math::{AffineExt, plane_space};

/// Writes contacts found by an algorithm into the manifold of its pair.
///
/// Algorithms report geometry in their own shape order (`body0`, `body1`).
/// `is_swapped` tells whether that order is the reverse of the manifold's
/// (A, B) order. It only decides which side a point is stored on and the
/// sign of the stored normal; it never feeds back into geometry.
pub struct ManifoldResult<'a> {
    manifold: &'a mut PersistentManifold,
    tr_a: Affine3A,
    tr_b: Affine3A,
    is_swapped: bool,
}

impl<'a> ManifoldResult<'a> {
    /// `tr_a` and `tr_b` are the world transforms of the manifold's bodies in
    /// (A, B) order.
    pub const fn new(
        manifold: &'a mut PersistentManifold,
        tr_a: Affine3A,
        tr_b: Affine3A,
        is_swapped: bool,
    ) -> Self {
        Self {
            manifold,
            tr_a,
            tr_b,
            is_swapped,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_swapped(&self) -> bool {
        self.is_swapped
    }

    #[inline]
    #[must_use]
    pub fn get_persistent_manifold(&self) -> &PersistentManifold {
        self.manifold
    }

    /// Adds a contact in algorithm order.
    ///
    /// * `normal_on_1_in_world` - unit normal on `body1`'s surface, pointing toward `body0`
    /// * `point_on_1_in_world` - contact point on `body1`
    /// * `depth` - signed separation, negative when overlapping
    /// * `index_0`, `index_1` - feature ids on `body0` and `body1`
    pub fn add_contact_point(
        &mut self,
        normal_on_1_in_world: Vec3A,
        point_on_1_in_world: Vec3A,
        depth: f32,
        index_0: i32,
        index_1: i32,
    ) -> Option<usize> {
        if !(depth.is_finite()
            && normal_on_1_in_world.is_finite()
            && point_on_1_in_world.is_finite())
        {
            return None;
        }

        let point_on_0_in_world = point_on_1_in_world + normal_on_1_in_world * depth;

        let (point_a, point_b, normal_a_to_b, index_a, index_b) = if self.is_swapped {
            (
                point_on_1_in_world,
                point_on_0_in_world,
                normal_on_1_in_world,
                index_1,
                index_0,
            )
        } else {
            (
                point_on_0_in_world,
                point_on_1_in_world,
                -normal_on_1_in_world,
                index_0,
                index_1,
            )
        };

        let mut new_pt = ManifoldPoint::new(
            self.tr_a.inv_x_form(point_a),
            self.tr_b.inv_x_form(point_b),
            normal_a_to_b,
            depth,
        );
        new_pt.position_world_on_a = point_a;
        new_pt.position_world_on_b = point_b;
        new_pt.index_0 = index_a;
        new_pt.index_1 = index_b;
        new_pt.combined_friction = self.manifold.combined_friction;
        new_pt.combined_restitution = self.manifold.combined_restitution;
        (new_pt.lateral_friction_dir_1, new_pt.lateral_friction_dir_2) = plane_space(normal_a_to_b);

        self.manifold.add_or_update_point(new_pt)
    }
}
