use log::error;

use crate::{
    collision::{
        broadphase::{CollisionAlgorithm, DispatcherInfo, ShapeProxy},
        narrowphase::{
            manifold_result::ManifoldResult,
            time_of_impact::{Sweep, conservative_advancement},
        },
        shapes::{
            collision_shape::CollisionShapes,
            sphere_shape::SphereShape,
            triangle_shape::{TriangleFeature, TriangleShape},
        },
    },
    linear_math::AffineExt,
};

/// Sphere against a single triangle, in `(sphere, triangle)` order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SphereTriangleCollisionAlgorithm;

/// Feature id stored on the triangle side of a contact.
#[must_use]
pub const fn triangle_feature_id(feature: TriangleFeature) -> i32 {
    match feature {
        TriangleFeature::Vertex(i) => i as i32,
        TriangleFeature::Edge(i) => 3 + i as i32,
        TriangleFeature::Face => 6,
    }
}

impl SphereTriangleCollisionAlgorithm {
    fn get_shapes<'a>(
        sphere_obj: &ShapeProxy<'a>,
        tri_obj: &ShapeProxy<'a>,
    ) -> Option<(&'a SphereShape, &'a TriangleShape)> {
        match (sphere_obj.get_collision_shape(), tri_obj.get_collision_shape()) {
            (CollisionShapes::Sphere(sphere), CollisionShapes::Triangle(triangle)) => {
                Some((sphere, triangle))
            }
            (shape0, shape1) => {
                error!(
                    "Sphere-triangle algorithm dispatched for {:?}/{:?}",
                    shape0.get_shape_type(),
                    shape1.get_shape_type()
                );
                None
            }
        }
    }
}

impl CollisionAlgorithm for SphereTriangleCollisionAlgorithm {
    fn process_collision(
        &self,
        sphere_obj: &ShapeProxy,
        tri_obj: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        let Some((sphere, triangle)) = Self::get_shapes(sphere_obj, tri_obj) else {
            return;
        };

        let tri_trans = tri_obj.get_world_transform();
        let sphere_in_tri = tri_trans.inv_x_form(sphere_obj.get_world_transform().translation);

        let Some(contact_info) = triangle.intersect_sphere(
            sphere_in_tri,
            sphere.get_radius(),
            dispatch_info.collision_margin,
        ) else {
            return;
        };

        result_out.add_contact_point(
            tri_trans.matrix3 * contact_info.result_normal,
            tri_trans.transform_point3a(contact_info.contact_point),
            contact_info.depth,
            -1,
            triangle_feature_id(contact_info.feature),
        );
    }

    fn calculate_time_of_impact(
        &self,
        sphere_obj: &ShapeProxy,
        sphere_sweep: &Sweep,
        tri_obj: &ShapeProxy,
        tri_sweep: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        let (sphere, triangle) = Self::get_shapes(sphere_obj, tri_obj)?;

        conservative_advancement(
            sphere_sweep,
            0.0,
            tri_sweep,
            triangle.get_bounding_radius(),
            dispatch_info.toi_tolerance,
            |sphere_trans, tri_trans| {
                triangle.sphere_distance(
                    tri_trans.inv_x_form(sphere_trans.translation),
                    sphere.get_radius(),
                )
            },
        )
    }
}
