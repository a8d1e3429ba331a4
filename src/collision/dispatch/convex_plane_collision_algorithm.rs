use arrayvec::ArrayVec;
use glam::{Affine3A, Vec3A};
use log::error;

use crate::{
    collision::{
        broadphase::{CollisionAlgorithm, DispatcherInfo, ShapeProxy},
        narrowphase::{
            manifold_result::ManifoldResult,
            time_of_impact::{Sweep, conservative_advancement},
        },
        shapes::{collision_shape::CollisionShapes, static_plane_shape::StaticPlaneShape},
    },
    linear_math::AffineExt,
};

/// Convex shape against an infinite plane, in `(convex, plane)` order.
///
/// Boxes and triangles report the vertices of their support feature, those
/// within the collision margin of the deepest vertex, so a resting box gets a
/// full 4-point manifold in one pass. Other convex shapes report their single
/// deepest support vertex.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvexPlaneCollisionAlgorithm;

impl ConvexPlaneCollisionAlgorithm {
    fn get_shapes<'a>(
        convex_obj: &ShapeProxy<'a>,
        plane_obj: &ShapeProxy<'a>,
    ) -> Option<(&'a CollisionShapes, &'a StaticPlaneShape)> {
        let (convex, CollisionShapes::StaticPlane(plane)) =
            (convex_obj.get_collision_shape(), plane_obj.get_collision_shape())
        else {
            error!(
                "Convex-plane algorithm dispatched for {:?}/{:?}",
                convex_obj.get_shape_type(),
                plane_obj.get_shape_type()
            );
            return None;
        };

        let degenerate = match convex {
            CollisionShapes::Sphere(sphere) => sphere.is_degenerate(),
            CollisionShapes::Box(obb) => obb.is_degenerate(),
            CollisionShapes::Triangle(triangle) => triangle.is_degenerate(),
            CollisionShapes::StaticPlane(_) => {
                error!("Convex-plane algorithm dispatched for two planes");
                true
            }
        };

        (!degenerate).then_some((convex, plane))
    }

    /// Candidate vertices of `convex` in its local space, with their feature ids.
    fn candidate_vertices(
        convex: &CollisionShapes,
        plane_normal_in_convex: Vec3A,
    ) -> ArrayVec<(Vec3A, i32), 8> {
        let mut vertices = ArrayVec::new();
        match convex {
            CollisionShapes::Box(obb) => {
                for (i, vtx) in obb.get_vertices().into_iter().enumerate() {
                    vertices.push((vtx, i as i32));
                }
            }
            CollisionShapes::Triangle(triangle) => {
                for (i, vtx) in triangle.points.into_iter().enumerate() {
                    vertices.push((vtx, i as i32));
                }
            }
            _ => {
                if let Some(vtx) = convex.local_get_supporting_vertex(-plane_normal_in_convex) {
                    vertices.push((vtx, -1));
                }
            }
        }
        vertices
    }

    fn distance(
        convex: &CollisionShapes,
        convex_trans: &Affine3A,
        plane: &StaticPlaneShape,
        plane_trans: &Affine3A,
    ) -> Option<f32> {
        let plane_normal = plane.get_plane_normal();
        let plane_in_convex = convex_trans.matrix3.transpose() * plane_trans.matrix3;
        let convex_in_plane_trans = plane_trans.transpose() * *convex_trans;

        let vtx = convex.local_get_supporting_vertex(plane_in_convex * -plane_normal)?;
        let vtx_in_plane = convex_in_plane_trans.transform_point3a(vtx);
        Some(plane_normal.dot(vtx_in_plane) - plane.get_plane_constant())
    }
}

impl CollisionAlgorithm for ConvexPlaneCollisionAlgorithm {
    fn process_collision(
        &self,
        convex_obj: &ShapeProxy,
        plane_obj: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        let Some((convex, plane)) = Self::get_shapes(convex_obj, plane_obj) else {
            return;
        };

        let convex_trans = convex_obj.get_world_transform();
        let plane_trans = plane_obj.get_world_transform();

        let plane_normal = plane.get_plane_normal();
        let plane_constant = plane.get_plane_constant();

        let plane_in_convex = convex_trans.matrix3.transpose() * plane_trans.matrix3;
        let convex_in_plane_trans = plane_trans.transpose() * *convex_trans;
        let normal_on_surface_b = plane_trans.matrix3 * plane_normal;

        let mut contacts = Self::candidate_vertices(convex, plane_in_convex * plane_normal)
            .into_iter()
            .map(|(vtx, feature_id)| {
                let vtx_in_plane = convex_in_plane_trans.transform_point3a(vtx);
                let distance = plane_normal.dot(vtx_in_plane) - plane_constant;
                (vtx_in_plane, distance, feature_id)
            })
            .collect::<ArrayVec<_, 8>>();

        let Some(deepest) = contacts
            .iter()
            .map(|&(_, distance, _)| distance)
            .reduce(f32::min)
        else {
            return;
        };

        // Vertices far above the support feature project onto the same plane
        // points as the ones below them and would overwrite them in the cache.
        let margin = dispatch_info.collision_margin;
        contacts.retain(|&mut (_, distance, _)| {
            distance < margin && distance <= deepest + margin
        });
        contacts.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        for (vtx_in_plane, distance, feature_id) in contacts {
            let vtx_in_plane_projected = vtx_in_plane - distance * plane_normal;
            let vtx_in_plane_world = plane_trans.transform_point3a(vtx_in_plane_projected);

            result_out.add_contact_point(
                normal_on_surface_b,
                vtx_in_plane_world,
                distance,
                feature_id,
                -1,
            );
        }
    }

    fn calculate_time_of_impact(
        &self,
        convex_obj: &ShapeProxy,
        convex_sweep: &Sweep,
        plane_obj: &ShapeProxy,
        plane_sweep: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        let (convex, plane) = Self::get_shapes(convex_obj, plane_obj)?;

        conservative_advancement(
            convex_sweep,
            convex.get_angular_motion_radius(),
            plane_sweep,
            0.0,
            dispatch_info.toi_tolerance,
            |convex_trans, plane_trans| Self::distance(convex, convex_trans, plane, plane_trans),
        )
    }
}
