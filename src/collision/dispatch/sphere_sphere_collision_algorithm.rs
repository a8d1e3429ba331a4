use glam::{Affine3A, Vec3A};
use log::error;

use crate::{
    collision::{
        broadphase::{CollisionAlgorithm, DispatcherInfo, ShapeProxy},
        narrowphase::{
            manifold_result::ManifoldResult,
            time_of_impact::{Sweep, conservative_advancement},
        },
        shapes::{collision_shape::CollisionShapes, sphere_shape::SphereShape},
    },
    linear_math::SIMD_EPSILON,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct SphereSphereCollisionAlgorithm;

impl SphereSphereCollisionAlgorithm {
    fn get_shapes<'a>(
        obj0: &ShapeProxy<'a>,
        obj1: &ShapeProxy<'a>,
    ) -> Option<(&'a SphereShape, &'a SphereShape)> {
        match (obj0.get_collision_shape(), obj1.get_collision_shape()) {
            (CollisionShapes::Sphere(sphere0), CollisionShapes::Sphere(sphere1))
                if !sphere0.is_degenerate() && !sphere1.is_degenerate() =>
            {
                Some((sphere0, sphere1))
            }
            (CollisionShapes::Sphere(_), CollisionShapes::Sphere(_)) => None,
            (shape0, shape1) => {
                error!(
                    "Sphere-sphere algorithm dispatched for {:?}/{:?}",
                    shape0.get_shape_type(),
                    shape1.get_shape_type()
                );
                None
            }
        }
    }

    fn distance(
        sphere0: &SphereShape,
        tr0: &Affine3A,
        sphere1: &SphereShape,
        tr1: &Affine3A,
    ) -> f32 {
        tr0.translation.distance(tr1.translation) - sphere0.get_radius() - sphere1.get_radius()
    }
}

impl CollisionAlgorithm for SphereSphereCollisionAlgorithm {
    fn process_collision(
        &self,
        body0: &ShapeProxy,
        body1: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        let Some((sphere0, sphere1)) = Self::get_shapes(body0, body1) else {
            return;
        };

        let center0 = body0.get_world_transform().translation;
        let center1 = body1.get_world_transform().translation;
        let radius0 = sphere0.get_radius();
        let radius1 = sphere1.get_radius();

        let diff = center0 - center1;
        let len = diff.length();
        if len >= radius0 + radius1 + dispatch_info.collision_margin {
            return;
        }

        // coincident centers have no preferred direction
        let normal_on_b = if len > SIMD_EPSILON {
            diff / len
        } else {
            Vec3A::X
        };

        result_out.add_contact_point(
            normal_on_b,
            center1 + normal_on_b * radius1,
            len - radius0 - radius1,
            -1,
            -1,
        );
    }

    fn calculate_time_of_impact(
        &self,
        body0: &ShapeProxy,
        sweep0: &Sweep,
        body1: &ShapeProxy,
        sweep1: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        let (sphere0, sphere1) = Self::get_shapes(body0, body1)?;

        conservative_advancement(
            sweep0,
            0.0,
            sweep1,
            0.0,
            dispatch_info.toi_tolerance,
            |tr0, tr1| Some(Self::distance(sphere0, tr0, sphere1, tr1)),
        )
    }
}
