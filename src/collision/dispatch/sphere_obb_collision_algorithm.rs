use glam::{Affine3A, Vec3A};
use log::error;

use crate::{
    collision::{
        broadphase::{CollisionAlgorithm, DispatcherInfo, ShapeProxy},
        narrowphase::{
            manifold_result::ManifoldResult,
            time_of_impact::{Sweep, conservative_advancement},
        },
        shapes::{
            box_shape::BoxShape, collision_shape::CollisionShapes, sphere_shape::SphereShape,
        },
    },
    linear_math::{AffineExt, SIMD_EPSILON},
};

/// Sphere against an oriented box, in `(sphere, box)` order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SphereObbCollisionAlgorithm;

/// Closest surface point of the box to a sphere center in box space.
struct BoxPenetration {
    normal: Vec3A,
    point: Vec3A,
    /// Signed distance from the center to the box surface.
    distance: f32,
}

impl SphereObbCollisionAlgorithm {
    fn get_shapes<'a>(
        sphere_obj: &ShapeProxy<'a>,
        obb_obj: &ShapeProxy<'a>,
    ) -> Option<(&'a SphereShape, &'a BoxShape)> {
        match (sphere_obj.get_collision_shape(), obb_obj.get_collision_shape()) {
            (CollisionShapes::Sphere(sphere), CollisionShapes::Box(obb))
                if !sphere.is_degenerate() && !obb.is_degenerate() =>
            {
                Some((sphere, obb))
            }
            (CollisionShapes::Sphere(_), CollisionShapes::Box(_)) => None,
            (shape0, shape1) => {
                error!(
                    "Sphere-box algorithm dispatched for {:?}/{:?}",
                    shape0.get_shape_type(),
                    shape1.get_shape_type()
                );
                None
            }
        }
    }

    fn box_penetration(half_extents: Vec3A, sphere_from_local: Vec3A) -> BoxPenetration {
        let closest = sphere_from_local.clamp(-half_extents, half_extents);
        let delta = sphere_from_local - closest;
        let dist = delta.length();

        if dist > SIMD_EPSILON {
            return BoxPenetration {
                normal: delta / dist,
                point: closest,
                distance: dist,
            };
        }

        // center is inside, push out through the nearest face
        let face_dist = half_extents - sphere_from_local.abs();
        let axis = face_dist.min_position();
        let sign = if sphere_from_local[axis].is_sign_negative() {
            -1.0
        } else {
            1.0
        };

        let mut normal = Vec3A::ZERO;
        normal[axis] = sign;
        let mut point = sphere_from_local;
        point[axis] = sign * half_extents[axis];

        BoxPenetration {
            normal,
            point,
            distance: -face_dist[axis],
        }
    }

    fn distance(
        sphere: &SphereShape,
        sphere_trans: &Affine3A,
        obb: &BoxShape,
        obb_trans: &Affine3A,
    ) -> f32 {
        let sphere_from_local = obb_trans.inv_x_form(sphere_trans.translation);
        Self::box_penetration(obb.get_half_extents(), sphere_from_local).distance
            - sphere.get_radius()
    }
}

impl CollisionAlgorithm for SphereObbCollisionAlgorithm {
    fn process_collision(
        &self,
        sphere_obj: &ShapeProxy,
        obb_obj: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        let Some((sphere, obb)) = Self::get_shapes(sphere_obj, obb_obj) else {
            return;
        };

        let box_trans = obb_obj.get_world_transform();
        let sphere_from_local = box_trans.inv_x_form(sphere_obj.get_world_transform().translation);
        let sphere_radius = sphere.get_radius();

        let pen = Self::box_penetration(obb.get_half_extents(), sphere_from_local);
        if pen.distance >= sphere_radius + dispatch_info.collision_margin {
            return;
        }

        result_out.add_contact_point(
            box_trans.matrix3 * pen.normal,
            box_trans.transform_point3a(pen.point),
            pen.distance - sphere_radius,
            -1,
            -1,
        );
    }

    fn calculate_time_of_impact(
        &self,
        sphere_obj: &ShapeProxy,
        sphere_sweep: &Sweep,
        obb_obj: &ShapeProxy,
        obb_sweep: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        let (sphere, obb) = Self::get_shapes(sphere_obj, obb_obj)?;

        conservative_advancement(
            sphere_sweep,
            0.0,
            obb_sweep,
            obb.get_half_extents().length(),
            dispatch_info.toi_tolerance,
            |sphere_trans, obb_trans| Some(Self::distance(sphere, sphere_trans, obb, obb_trans)),
        )
    }
}
